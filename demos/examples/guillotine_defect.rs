//! Two guillotine panels around a defect, run straight from the builder
//! API (no CSV involved) -- the end-to-end scenario from spec.md §8 #1:
//! bin 6000x3210, a 3000x3210 panel, a 3000x500 panel, and a 2x2 defect
//! that the second panel's cut must route around.
//!
//! Run: `cargo run -p demos --example guillotine_defect`

use anyhow::Result;
use packingsolver_instance::{InstanceBuilder, Point, RotationMask, Size};
use packingsolver_rectangleguillotine::{GuillotineParameters, GuillotineScheme};
use packingsolver_search::{CancellationToken, IbsParameters, iterative_beam_search};
use packingsolver_solution::SolutionPool;

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

fn main() -> Result<()> {
    let _log_guard = init_logging();

    let mut builder = InstanceBuilder::new();
    let bin = builder.add_rectangle_bin_type(Size::new(6000.0, 3210.0), None, 1, 0, Default::default())?;
    builder.add_rectangle_item_type(Size::new(3000.0, 3210.0), RotationMask::CANONICAL_ONLY, 1, None, 0.0, 0)?;
    builder.add_rectangle_item_type(Size::new(3000.0, 500.0), RotationMask::CANONICAL_ONLY, 1, None, 0.0, 0)?;
    builder.add_defect(bin, Point::new(3100.0, 600.0), Size::new(2.0, 2.0))?;
    let instance = builder.build()?;

    let mut scheme = GuillotineScheme::new(&instance, GuillotineParameters::default());
    let pool = SolutionPool::new(&instance, 1);
    let cancel = CancellationToken::new();
    let output = iterative_beam_search(&mut scheme, &pool, &IbsParameters::default(), &cancel);

    let best = pool.best().expect("an instance this small must pack completely");
    tracing::info!(
        nodes = output.node_number,
        bins = best.number_of_bins(),
        waste = best.waste(),
        "search complete"
    );
    println!(
        "packed {} item(s) into {} bin(s), waste = {}",
        best.number_of_items(),
        best.number_of_bins(),
        best.waste()
    );
    Ok(())
}
