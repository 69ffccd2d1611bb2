//! Hot-path benchmarks: rectangle insertion enumeration and the IBS
//! depth-layer expansion it drives, plus the same search loop over the
//! guillotine and box schemes for comparison.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use packingsolver_box::{BoxParameters, BoxScheme};
use packingsolver_instance::{Instance, InstanceBuilder, Point, RotationMask, Size, Size3};
use packingsolver_rectangle::{RectangleParameters, RectangleScheme};
use packingsolver_rectangleguillotine::{GuillotineParameters, GuillotineScheme};
use packingsolver_search::{BranchingScheme, CancellationToken, IbsParameters, iterative_beam_search};
use packingsolver_solution::SolutionPool;

fn rectangle_instance() -> Instance {
    let mut builder = InstanceBuilder::new();
    builder
        .add_rectangle_bin_type(Size::new(1000.0, 1000.0), None, 1, 0, Default::default())
        .unwrap();
    for (w, h) in [(300.0, 200.0), (150.0, 150.0), (400.0, 100.0), (200.0, 300.0)] {
        builder
            .add_rectangle_item_type(Size::new(w, h), RotationMask::FREE_2D, 4, None, 1.0, 0)
            .unwrap();
    }
    builder.build().unwrap()
}

fn guillotine_instance() -> Instance {
    let mut builder = InstanceBuilder::new();
    let bin = builder
        .add_rectangle_bin_type(Size::new(6000.0, 3210.0), None, 1, 0, Default::default())
        .unwrap();
    builder
        .add_rectangle_item_type(Size::new(3000.0, 3210.0), RotationMask::CANONICAL_ONLY, 1, None, 0.0, 0)
        .unwrap();
    builder
        .add_rectangle_item_type(Size::new(3000.0, 500.0), RotationMask::CANONICAL_ONLY, 1, None, 0.0, 0)
        .unwrap();
    builder.add_defect(bin, Point::new(3100.0, 600.0), Size::new(2.0, 2.0)).unwrap();
    builder.build().unwrap()
}

fn box_instance() -> Instance {
    let mut builder = InstanceBuilder::new();
    builder
        .add_box_bin_type(Size3::new(1000.0, 1000.0, 1000.0), None, 1, 0, 0.0, 0.0, None)
        .unwrap();
    for (x, y, z) in [(300.0, 200.0, 400.0), (150.0, 150.0, 150.0), (400.0, 100.0, 300.0)] {
        builder
            .add_box_item_type(Size3::new(x, y, z), RotationMask::FREE_3D, 4, None, 1.0, 0, 0, u32::MAX, f64::MAX, 0.0)
            .unwrap();
    }
    builder.build().unwrap()
}

fn run_rectangle(instance: &Instance) {
    let mut scheme = RectangleScheme::new(instance, RectangleParameters::default());
    let pool = SolutionPool::new(instance, 1);
    let cancel = CancellationToken::new();
    black_box(iterative_beam_search(&mut scheme, &pool, &IbsParameters::default(), &cancel));
}

fn run_guillotine(instance: &Instance) {
    let mut scheme = GuillotineScheme::new(instance, GuillotineParameters::default());
    let pool = SolutionPool::new(instance, 1);
    let cancel = CancellationToken::new();
    black_box(iterative_beam_search(&mut scheme, &pool, &IbsParameters::default(), &cancel));
}

fn run_box(instance: &Instance) {
    let mut scheme = BoxScheme::new(instance, BoxParameters::default());
    let pool = SolutionPool::new(instance, 1);
    let cancel = CancellationToken::new();
    black_box(iterative_beam_search(&mut scheme, &pool, &IbsParameters::default(), &cancel));
}

fn rectangle_root_children(instance: &Instance) {
    let mut scheme = RectangleScheme::new(instance, RectangleParameters::default());
    let root = scheme.root();
    black_box(scheme.children(root));
}

fn bench_ibs(c: &mut Criterion) {
    let rect = rectangle_instance();
    let guillotine = guillotine_instance();
    let boxed = box_instance();

    let mut group = c.benchmark_group("iterative_beam_search");
    group.bench_function("rectangle", |b| b.iter(|| run_rectangle(&rect)));
    group.bench_function("rectangleguillotine", |b| b.iter(|| run_guillotine(&guillotine)));
    group.bench_function("box", |b| b.iter(|| run_box(&boxed)));
    group.finish();

    c.bench_function("rectangle_root_insertion_enumeration", |b| b.iter(|| rectangle_root_children(&rect)));
}

criterion_group!(benches, bench_ibs);
criterion_main!(benches);
