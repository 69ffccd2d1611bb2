//! `bins.csv`: one row per bin type (spec.md §6).

use anyhow::{Context, Result, bail};
use packingsolver_instance::{
    BinTypeId, InstanceBuilder, SemiTrailerTruckData, Size, Size3, Trim, TrimKind, Trims,
};
use std::path::Path;

use crate::row::{Row, open_with_header};

/// Reads `bins.csv` and adds one bin type per row to `builder`.
///
/// `three_dimensional` selects between [`InstanceBuilder::add_rectangle_bin_type`]
/// (2D) and [`InstanceBuilder::add_box_bin_type`] (3D, requires a `Z`
/// column). Returns the bin type ids in CSV row order, which is also the
/// id `defects.csv`'s `BIN` column refers to.
pub fn read_bin_types(
    path: impl AsRef<Path>,
    builder: &mut InstanceBuilder,
    three_dimensional: bool,
) -> Result<Vec<BinTypeId>> {
    let path = path.as_ref();
    let (mut reader, header) = open_with_header(path)?;
    let mut ids = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut line = 1u64;
    while reader.read_record(&mut record).with_context(|| format!("{}: read row", path.display()))? {
        line += 1;
        let row = Row::new(&header, record.clone(), line);
        let x = row.f64("X")?;
        let y = row.f64("Y")?;
        let cost = row.f64_or("COST", -1.0)?;
        let cost = if cost < 0.0 { None } else { Some(cost) };
        let copies = row.i64_or("COPIES", 1)?;
        let copies_min = row.i64_or("COPIES_MIN", 0)?;
        let maximum_weight = row.f64_or("MAXIMUM_WEIGHT", 0.0)?;
        let maximum_stack_density = row.f64_or("MAXIMUM_STACK_DENSITY", 0.0)?;

        let id = if three_dimensional {
            if !row.has_column("Z") {
                bail!("{}: row {}: missing mandatory column 'Z' for a 3D instance", path.display(), line);
            }
            let z = row.f64("Z")?;
            let semi_trailer_truck = read_semi_trailer_truck(&row)?;
            builder.add_box_bin_type(
                Size3::new(x, y, z),
                cost,
                copies,
                copies_min,
                maximum_weight,
                maximum_stack_density,
                semi_trailer_truck,
            )?
        } else {
            let trims = Trims {
                left: Trim { width: row.f64_or("LEFT_TRIM", 0.0)?, kind: trim_kind(&row, "LEFT_TRIM_TYPE") },
                right: Trim { width: row.f64_or("RIGHT_TRIM", 0.0)?, kind: trim_kind(&row, "RIGHT_TRIM_TYPE") },
                bottom: Trim { width: row.f64_or("BOTTOM_TRIM", 0.0)?, kind: trim_kind(&row, "BOTTOM_TRIM_TYPE") },
                top: Trim { width: row.f64_or("TOP_TRIM", 0.0)?, kind: trim_kind(&row, "TOP_TRIM_TYPE") },
            };
            let id = builder.add_rectangle_bin_type(Size::new(x, y), cost, copies, copies_min, trims)?;
            if maximum_weight > 0.0 {
                builder.set_bin_type_maximum_weight(id, maximum_weight)?;
            }
            id
        };
        ids.push(id);
    }
    if ids.is_empty() {
        bail!("{}: no bin type rows", path.display());
    }
    Ok(ids)
}

fn trim_kind(row: &Row<'_>, column: &str) -> TrimKind {
    match row.str_or(column, "hard") {
        "soft" | "SOFT" | "Soft" => TrimKind::Soft,
        _ => TrimKind::Hard,
    }
}

fn read_semi_trailer_truck(row: &Row<'_>) -> Result<Option<SemiTrailerTruckData>> {
    if !row.has_column("MIDDLE_AXLE_MAXIMUM_WEIGHT") && !row.has_column("REAR_AXLE_MAXIMUM_WEIGHT") {
        return Ok(None);
    }
    Ok(Some(SemiTrailerTruckData {
        middle_axle_maximum_weight: row.f64_or("MIDDLE_AXLE_MAXIMUM_WEIGHT", f64::MAX)?,
        rear_axle_maximum_weight: row.f64_or("REAR_AXLE_MAXIMUM_WEIGHT", f64::MAX)?,
        middle_axle_position: row.f64_or("MIDDLE_AXLE_POSITION", 0.0)?,
        rear_axle_position: row.f64_or("REAR_AXLE_POSITION", 0.0)?,
    }))
}
