// SPDX-License-Identifier: MIT

//! CSV instance and solution IO for the cutting-and-packing
//! branching-scheme engine (spec.md §6), kept outside
//! `packingsolver_instance`/`packingsolver_solution` as an external
//! collaborator: the core model never depends on a file format.
//!
//! Instance files (`bins.csv`, `items.csv`, `defects.csv`,
//! `parameters.csv`) are comma- or semicolon-separated with a header row;
//! column order is free and most columns default when absent, so rows are
//! read through a header->index lookup ([`row`]) rather than a fixed
//! `Deserialize` schema. [`read_instance`] drives all four into one
//! [`packingsolver_instance::InstanceBuilder`].
//!
//! Solution files are written by [`write_placed_items_csv`] and, for
//! rectangle-guillotine solutions, [`write_cut_tree_csv`].

mod bins;
mod defects;
mod items;
mod parameters;
mod row;
mod solution;

use anyhow::{Context, Result};
use packingsolver_instance::{Instance, InstanceBuilder};
use std::path::Path;

pub use bins::read_bin_types;
pub use defects::read_defects;
pub use items::read_item_types;
pub use parameters::read_parameters;
pub use solution::{write_cut_tree_csv, write_placed_items_csv};

/// Paths to the four CSV files that describe one instance (spec.md §6).
/// `defects_path`/`parameters_path` are optional: an instance with no
/// defects or default parameters may omit them.
#[derive(Clone, Debug)]
pub struct InstancePaths<'p> {
    /// `bins.csv`.
    pub bins: &'p Path,
    /// `items.csv`.
    pub items: &'p Path,
    /// `defects.csv`, if the instance has any defects.
    pub defects: Option<&'p Path>,
    /// `parameters.csv`, if the instance overrides the default objective
    /// or unloading constraint.
    pub parameters: Option<&'p Path>,
}

/// Reads `bins.csv`, `items.csv`, and (if given) `defects.csv` /
/// `parameters.csv` into a freshly built [`Instance`].
///
/// `three_dimensional` selects the box (3D) geometry family over rectangle
/// (2D); it must match what the branching scheme the instance feeds
/// expects. Bin-type ids in the returned instance are assigned in
/// `bins.csv` row order, matching `defects.csv`'s `BIN` column.
pub fn read_instance(paths: &InstancePaths<'_>, three_dimensional: bool) -> Result<Instance> {
    let mut builder = InstanceBuilder::new();
    if let Some(parameters) = paths.parameters {
        read_parameters(parameters, &mut builder)
            .with_context(|| format!("reading parameters from {}", parameters.display()))?;
    }
    let bin_type_ids = bins::read_bin_types(paths.bins, &mut builder, three_dimensional)
        .with_context(|| format!("reading bin types from {}", paths.bins.display()))?;
    items::read_item_types(paths.items, &mut builder, three_dimensional)
        .with_context(|| format!("reading item types from {}", paths.items.display()))?;
    if let Some(defects) = paths.defects {
        defects::read_defects(defects, &mut builder, &bin_type_ids)
            .with_context(|| format!("reading defects from {}", defects.display()))?;
    }
    builder.build().context("building instance from CSV")
}

#[cfg(test)]
mod tests {
    use super::*;
    use packingsolver_instance::Objective;
    use packingsolver_search::CancellationToken;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn scratch_dir(label: &str) -> std::path::PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("packingsolver_io_test_{label}_{n}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn reads_rectangle_instance_with_defaults() {
        let dir = scratch_dir("rect_defaults");
        let bins = dir.join("bins.csv");
        let items = dir.join("items.csv");
        write(&bins, "X,Y,COPIES\n100,50,-1\n");
        write(&items, "X,Y,COPIES\n10,5,3\n20,10,1\n");

        let instance = read_instance(&InstancePaths { bins: &bins, items: &items, defects: None, parameters: None }, false).unwrap();

        assert_eq!(instance.number_of_bin_types(), 1);
        assert_eq!(instance.number_of_item_types(), 2);
        // PROFIT defaults to area, WEIGHT to 0, COPIES_MIN to 0.
        assert_eq!(instance.item_type(0).profit(), 50.0);
        assert_eq!(instance.item_type(0).weight(), 0.0);
        assert_eq!(instance.objective(), Objective::Default);
    }

    #[test]
    fn reads_semicolon_delimited_files() {
        let dir = scratch_dir("semicolon");
        let bins = dir.join("bins.csv");
        let items = dir.join("items.csv");
        write(&bins, "X;Y;COPIES\n100;50;-1\n");
        write(&items, "X;Y;COPIES\n10;5;3\n");

        let instance = read_instance(&InstancePaths { bins: &bins, items: &items, defects: None, parameters: None }, false).unwrap();
        assert_eq!(instance.number_of_item_types(), 1);
    }

    #[test]
    fn parameters_csv_sets_objective_and_unloading_constraint() {
        let dir = scratch_dir("parameters");
        let bins = dir.join("bins.csv");
        let items = dir.join("items.csv");
        let parameters = dir.join("parameters.csv");
        write(&bins, "X,Y,COPIES\n100,50,-1\n");
        write(&items, "X,Y\n10,5\n");
        write(&parameters, "NAME,VALUE\nobjective,BinPacking\nunloading-constraint,OnlyXMovements\n");

        let instance = read_instance(
            &InstancePaths { bins: &bins, items: &items, defects: None, parameters: Some(&parameters) },
            false,
        )
        .unwrap();
        assert_eq!(instance.objective(), Objective::BinPacking);
        assert_eq!(instance.unloading_constraint(), packingsolver_instance::UnloadingConstraint::OnlyXMovements);
    }

    #[test]
    fn defects_csv_maps_bin_row_to_bin_type_id() {
        let dir = scratch_dir("defects");
        let bins = dir.join("bins.csv");
        let items = dir.join("items.csv");
        let defects = dir.join("defects.csv");
        write(&bins, "X,Y,COPIES\n100,50,-1\n200,100,-1\n");
        write(&items, "X,Y\n10,5\n");
        write(&defects, "BIN,X,Y,LX,LY\n1,10,10,2,2\n");

        let instance = read_instance(
            &InstancePaths { bins: &bins, items: &items, defects: Some(&defects), parameters: None },
            false,
        )
        .unwrap();
        assert_eq!(instance.defects().len(), 1);
        assert_eq!(instance.defects()[0].bin_type_id, 1);
    }

    #[test]
    fn missing_mandatory_column_is_a_configuration_error() {
        let dir = scratch_dir("missing_column");
        let bins = dir.join("bins.csv");
        let items = dir.join("items.csv");
        write(&bins, "X,COPIES\n100,-1\n"); // missing mandatory Y
        write(&items, "X,Y\n10,5\n");

        let err = read_instance(&InstancePaths { bins: &bins, items: &items, defects: None, parameters: None }, false).unwrap_err();
        assert!(format!("{err:#}").contains('Y'));
    }

    #[test]
    fn round_trip_csv_to_instance_to_solution_csv() {
        let dir = scratch_dir("round_trip");
        let bins = dir.join("bins.csv");
        let items = dir.join("items.csv");
        let solution_path = dir.join("solution.csv");
        write(&bins, "X,Y,COPIES\n10,10,-1\n");
        write(&items, "X,Y,COPIES\n4,3,4\n5,5,2\n");

        let instance = read_instance(&InstancePaths { bins: &bins, items: &items, defects: None, parameters: None }, false).unwrap();

        let mut scheme = packingsolver_rectangle::RectangleScheme::new(&instance, packingsolver_rectangle::RectangleParameters::default());
        let pool = packingsolver_solution::SolutionPool::new(&instance, 1);
        let cancel = CancellationToken::new();
        packingsolver_search::iterative_beam_search(&mut scheme, &pool, &packingsolver_search::IbsParameters::default(), &cancel);
        let best = pool.best().expect("small bin-packing instance always yields a solution");

        let rows = write_placed_items_csv(&solution_path, &best).unwrap();
        assert_eq!(rows, best.number_of_items());

        let written = std::fs::read_to_string(&solution_path).unwrap();
        let data_rows = written.lines().count() - 1;
        assert_eq!(data_rows, rows);
    }
}
