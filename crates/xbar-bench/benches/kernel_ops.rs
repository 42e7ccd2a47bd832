//! Criterion benchmarks for kernel-level operations: worker scaling,
//! partition splitting, and state initialization.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use xbar_core::CrossbarState;
use xbar_engine::{CrossbarEngine, EngineConfig, RowPartition};
use xbar_test_utils::fixtures::heating_physics;

fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_scaling_256");
    for workers in [1usize, 2, 4, 8] {
        let config = EngineConfig::new(256)
            .with_seed(42)
            .with_workers(workers)
            .with_physics(heating_physics());
        let mut engine = CrossbarEngine::new(config).unwrap();
        let v = vec![0.5; 256];
        let mut out = vec![0.0; 256];
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| {
                engine.compute_into(black_box(&v), &mut out).unwrap();
                black_box(&out);
            });
        });
    }
    group.finish();
}

fn bench_partition_split(c: &mut Criterion) {
    let mut state = CrossbarState::new(512, Some(1)).unwrap();
    let mut currents = vec![0.0; 512];
    let partition = RowPartition::even(512, 16).unwrap();

    c.bench_function("partition_split_512x16", |b| {
        b.iter(|| {
            let bands = partition.split(state.cells_mut(), &mut currents);
            black_box(bands.len());
        });
    });
}

fn bench_initialize(c: &mut Criterion) {
    let mut state = CrossbarState::new(512, Some(1)).unwrap();

    c.bench_function("initialize_512", |b| {
        b.iter(|| {
            state.initialize();
            black_box(state.cell_count());
        });
    });
}

fn bench_harness_overhead(c: &mut Criterion) {
    let mut engine = CrossbarEngine::new(EngineConfig::new(32).with_seed(1).with_workers(1)).unwrap();

    c.bench_function("harness_100_iters_32", |b| {
        b.iter(|| {
            let report = engine.benchmark(100).unwrap();
            black_box(report);
        });
    });
}

criterion_group!(
    benches,
    bench_worker_scaling,
    bench_partition_split,
    bench_initialize,
    bench_harness_overhead
);
criterion_main!(benches);
