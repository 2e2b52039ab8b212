//! Benchmarks for terrain algorithms

use avaterrain_algorithms::terrain::{slope, CellSize, SlopeParams};
use avaterrain_core::Raster;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_dem(size: usize) -> Raster<avaterrain_core::Sample> {
    // Planar ramp plus a repeating bump pattern
    let values = (0..size)
        .flat_map(|row| {
            (0..size).map(move |col| {
                let base = (row + col) as f64 * 20.0;
                let variation = ((row * 7 + col * 13) % 100) as f64;
                base + variation
            })
        })
        .collect();
    Raster::from_values(values, size, size).unwrap()
}

fn bench_slope(c: &mut Criterion) {
    let mut group = c.benchmark_group("slope");
    let params = SlopeParams {
        cell_size: CellSize::from_resolution(1.0 / 1200.0, 57.0).unwrap(),
    };

    for size in [256, 512, 1024, 2048].iter() {
        let dem = create_dem(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| slope(black_box(&dem), params.clone()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_slope);
criterion_main!(benches);
