use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sampler::{sample, Projection, RotationState, SampleGrid, TorusGeometry};

fn bench_full_pass(c: &mut Criterion) {
    let geometry = TorusGeometry::default();
    let projection = Projection::default();
    let grid = SampleGrid::default();
    c.bench_function("sample_default_grid", |b| {
        b.iter(|| {
            sample(
                black_box(RotationState::new(1.0, 1.0)),
                &geometry,
                &projection,
                &grid,
                (400.0, 300.0),
            )
            .fold(0.0_f32, |acc, s| acc + s.luminance)
        });
    });
}

criterion_group!(benches, bench_full_pass);
criterion_main!(benches);
