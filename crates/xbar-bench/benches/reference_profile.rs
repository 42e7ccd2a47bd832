//! Criterion benchmarks for whole-engine propagation at the standard profiles.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use xbar_bench::{reference_profile, small_profile, stress_profile};
use xbar_engine::CrossbarEngine;

fn bench_compute_4k(c: &mut Criterion) {
    let mut engine = CrossbarEngine::new(small_profile(42)).unwrap();
    let v = vec![0.5; engine.size()];
    let mut out = vec![0.0; engine.size()];

    c.bench_function("compute_4k", |b| {
        b.iter(|| {
            engine.compute_into(black_box(&v), &mut out).unwrap();
            black_box(&out);
        });
    });
}

fn bench_compute_64k(c: &mut Criterion) {
    let mut engine = CrossbarEngine::new(reference_profile(42)).unwrap();
    let v = vec![0.5; engine.size()];
    let mut out = vec![0.0; engine.size()];

    c.bench_function("compute_64k", |b| {
        b.iter(|| {
            engine.compute_into(black_box(&v), &mut out).unwrap();
            black_box(&out);
        });
    });
}

fn bench_compute_1m(c: &mut Criterion) {
    let mut engine = CrossbarEngine::new(stress_profile(42)).unwrap();
    let v = vec![0.5; engine.size()];
    let mut out = vec![0.0; engine.size()];

    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("compute_1m", |b| {
        b.iter(|| {
            engine.compute_into(black_box(&v), &mut out).unwrap();
            black_box(&out);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_compute_4k, bench_compute_64k, bench_compute_1m);
criterion_main!(benches);
