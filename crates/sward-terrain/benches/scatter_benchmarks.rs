use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sward_grid::CellCoord;
use sward_terrain::{FlatTerrain, ScatterParams, generate_cell};

/// Full-density generation of a single cell, the cost the per-tick
/// admission budget exists to bound.
fn bench_generate_cell(c: &mut Criterion) {
    let sampler = FlatTerrain::new(0.0);
    let params = ScatterParams::default();

    c.bench_function("generate_cell", |b| {
        b.iter(|| generate_cell(black_box(CellCoord::new(3, -2)), &sampler, &params))
    });
}

criterion_group!(benches, bench_generate_cell);
criterion_main!(benches);
