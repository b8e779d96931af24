//! Criterion micro-benchmarks for group expansion and job resolution.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use spool_bench::{full_profile, redundant_requests, viz_profile};
use spool_core::GroupTable;

/// Benchmark: expand 100 overlapping group requests.
fn bench_expand_redundant(c: &mut Criterion) {
    let groups = GroupTable::standard();
    let requests = redundant_requests(100);

    c.bench_function("expand_redundant_100", |b| {
        b.iter(|| black_box(groups.expand(&requests)));
    });
}

/// Benchmark: resolve the visualisation profile.
fn bench_resolve_viz(c: &mut Criterion) {
    let config = viz_profile();

    c.bench_function("resolve_viz", |b| {
        b.iter(|| black_box(config.resolve().unwrap()));
    });
}

/// Benchmark: resolve the full profile.
fn bench_resolve_full(c: &mut Criterion) {
    let config = full_profile();

    c.bench_function("resolve_full", |b| {
        b.iter(|| black_box(config.resolve().unwrap()));
    });
}

criterion_group!(
    benches,
    bench_expand_redundant,
    bench_resolve_viz,
    bench_resolve_full
);
criterion_main!(benches);
