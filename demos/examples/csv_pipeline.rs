//! Full CSV -> instance -> search -> CSV pipeline for the rectangle
//! scheme: write a tiny `bins.csv`/`items.csv` pair to a temp directory,
//! read it back through `packingsolver_io`, run the rectangle scheme under
//! iterative beam search, then write the resulting placements back out as
//! CSV (spec.md §6's external interface, round-tripped end to end).
//!
//! Run: `cargo run -p demos --example csv_pipeline`

use anyhow::Result;
use packingsolver_io::{InstancePaths, read_instance, write_placed_items_csv};
use packingsolver_rectangle::{RectangleParameters, RectangleScheme};
use packingsolver_search::{CancellationToken, IbsParameters, iterative_beam_search};
use packingsolver_solution::SolutionPool;
use std::io::Write;

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let appender = tracing_appender::rolling::never(".", "packingsolver-demo.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
        .ok()
        .map(|()| guard)
}

fn write_file(path: &std::path::Path, contents: &str) -> Result<()> {
    let mut f = std::fs::File::create(path)?;
    f.write_all(contents.as_bytes())?;
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = init_logging();

    let dir = std::env::temp_dir().join("packingsolver_csv_pipeline_demo");
    std::fs::create_dir_all(&dir)?;
    let bins_path = dir.join("bins.csv");
    let items_path = dir.join("items.csv");
    let parameters_path = dir.join("parameters.csv");
    let solution_path = dir.join("solution.csv");

    write_file(&bins_path, "X,Y,COPIES\n10,10,-1\n")?;
    write_file(&items_path, "X,Y,COPIES,ROTATIONS\n4,3,4,3\n5,5,2,1\n")?;
    write_file(&parameters_path, "NAME,VALUE\nobjective,BinPacking\n")?;

    let instance = read_instance(
        &InstancePaths {
            bins: &bins_path,
            items: &items_path,
            defects: None,
            parameters: Some(&parameters_path),
        },
        false,
    )?;

    let mut scheme = RectangleScheme::new(&instance, RectangleParameters::default());
    let pool = SolutionPool::new(&instance, 1);
    let cancel = CancellationToken::new();
    let output = iterative_beam_search(&mut scheme, &pool, &IbsParameters::default(), &cancel);

    let best = pool.best().expect("a bin-packing instance this small always yields a solution");
    let rows_written = write_placed_items_csv(&solution_path, &best)?;

    tracing::info!(nodes = output.node_number, bins = best.number_of_bins(), "pipeline complete");
    println!(
        "read instance from {}, packed {} item(s) into {} bin(s), wrote {rows_written} row(s) to {}",
        items_path.display(),
        best.number_of_items(),
        best.number_of_bins(),
        solution_path.display()
    );
    Ok(())
}
