use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use vitals::config::CollectorConfigBuilder;
use vitals::window::{Bucket, OutcomeKind};
use vitals::Collector;

fn bucket_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket");
    group.throughput(Throughput::Elements(1));

    let bucket = Bucket::new();
    group.bench_function("increment", |b| {
        b.iter(|| bucket.increment(black_box(OutcomeKind::Success)))
    });

    // Health probe against a bucket with a realistic mix of outcomes
    let probe = Bucket::new();
    for _ in 0..90 {
        probe.increment(OutcomeKind::Success);
    }
    for _ in 0..10 {
        probe.increment(OutcomeKind::Failure);
    }
    group.bench_function("is_healthy", |b| {
        b.iter(|| black_box(probe.is_healthy(black_box(0.5))))
    });

    group.finish();
}

fn collector_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector");
    group.throughput(Throughput::Elements(1));

    let collector =
        Collector::new(CollectorConfigBuilder::new().capacity_secs(10).build()).unwrap();

    group.bench_function("current_bucket", |b| {
        b.iter(|| black_box(collector.current_bucket()))
    });

    group.bench_function("record_and_evict", |b| {
        b.iter(|| {
            collector.current_bucket().increment(OutcomeKind::Success);
            collector.evict_outdated();
        })
    });

    group.bench_function("is_healthy", |b| {
        b.iter(|| black_box(collector.is_healthy()))
    });

    group.finish();
}

criterion_group!(benches, bucket_benchmark, collector_benchmark);
criterion_main!(benches);
