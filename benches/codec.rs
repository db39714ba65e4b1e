//! Codec benchmarks.
//!
//! The compact delimited codec exists to keep per-activity storage small
//! and encode/decode cheap on the fan-out path; the binary codec trades
//! size for schema flexibility. These benchmarks track both directions
//! for each.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench codec
//! ```

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fanoutdb::{Activity, ActivitySerializer, BinarySerializer, Serializer, Verb};
use serde_json::json;

fn sample_activity(with_context: bool) -> Activity {
    let t = Utc.timestamp_micros(1_500_000_000_123_456).unwrap();
    let mut activity = Activity::new(13, Verb::new(1, "follow"), 2000)
        .with_time(t)
        .with_target(99);
    if with_context {
        activity = activity
            .with_context("likes", json!(12))
            .with_context("source", json!("web"));
    }
    activity
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    for (name, codec) in [
        ("compact", Box::new(ActivitySerializer::new()) as Box<dyn Serializer>),
        ("binary", Box::new(BinarySerializer::new())),
    ] {
        let plain = sample_activity(false).into();
        group.bench_function(format!("{name}/plain"), |b| {
            b.iter(|| codec.encode(black_box(&plain)).unwrap())
        });

        let with_context = sample_activity(true).into();
        group.bench_function(format!("{name}/with_context"), |b| {
            b.iter(|| codec.encode(black_box(&with_context)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    for (name, codec) in [
        ("compact", Box::new(ActivitySerializer::new()) as Box<dyn Serializer>),
        ("binary", Box::new(BinarySerializer::new())),
    ] {
        let token = codec.encode(&sample_activity(true).into()).unwrap();
        group.bench_function(format!("{name}/with_context"), |b| {
            b.iter(|| codec.decode(black_box(&token)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
