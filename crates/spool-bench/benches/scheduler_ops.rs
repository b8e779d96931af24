//! Criterion micro-benchmarks for scheduler construction and metadata
//! records, against the recording archive.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use spool_bench::full_profile;
use spool_dump::DumpScheduler;
use spool_test_utils::{MockContext, RecordingFactory};

/// Benchmark: open, register, and close the full profile.
fn bench_open_full(c: &mut Criterion) {
    let context = MockContext::single_rank();

    c.bench_function("open_close_full", |b| {
        b.iter(|| {
            let factory = RecordingFactory::new();
            let dump = DumpScheduler::open(full_profile(), &factory, &context).unwrap();
            black_box(dump.registrations());
            dump.close().unwrap();
        });
    });
}

/// Benchmark: encode and write a small nested metadata record.
fn bench_metadata_record(c: &mut Criterion) {
    let factory = RecordingFactory::new();
    let context = MockContext::single_rank();
    let mut dump = DumpScheduler::open(full_profile(), &factory, &context).unwrap();
    let shapes = json!([
        {"type": "Sphere", "diameter": 1.0},
        {"type": "Ellipsoid", "a": 1.0, "b": 0.5, "c": 0.25},
        {"type": "Polygon", "vertices": [[0.0, 0.0], [1.0, 0.0], [0.5, 0.8]]},
    ]);

    let name = "type_shapes.json";

    c.bench_function("metadata_record_shapes", |b| {
        b.iter(|| {
            dump.write_metadata_record(name, &shapes, false).unwrap();
            factory.clear();
        });
    });
}

criterion_group!(benches, bench_open_full, bench_metadata_record);
criterion_main!(benches);
