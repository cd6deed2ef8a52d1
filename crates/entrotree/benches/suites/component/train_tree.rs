//! Component benchmarks: tree training, sequential vs parallel.

#[path = "../../common/mod.rs"]
mod common;

use common::criterion_config::default_criterion;

use entrotree::feature::FeatureRegistry;
use entrotree::testing::data::synthetic_comments;
use entrotree::training::{train, TreeParams};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_train(c: &mut Criterion) {
    let registry = FeatureRegistry::standard();
    let mut group = c.benchmark_group("component/train/tree");

    for n_records in [1_000usize, 10_000] {
        let records = synthetic_comments(n_records, 42, 0.1);
        group.throughput(Throughput::Elements(n_records as u64));

        for n_threads in [1usize, 0] {
            let params = TreeParams::builder().n_threads(n_threads).build().unwrap();
            let label = if n_threads == 1 { "sequential" } else { "parallel" };
            group.bench_with_input(BenchmarkId::new(label, n_records), &records, |b, records| {
                b.iter(|| black_box(train(black_box(records), &params, &registry).unwrap()))
            });
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_train
}
criterion_main!(benches);
