//! Component benchmarks: batch classification.

#[path = "../../common/mod.rs"]
mod common;

use common::criterion_config::default_criterion;

use entrotree::feature::FeatureRegistry;
use entrotree::inference::Classifier;
use entrotree::testing::data::synthetic_comments;
use entrotree::training::{train, TreeParams};
use entrotree::utils::Parallelism;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_classify(c: &mut Criterion) {
    let registry = FeatureRegistry::standard();
    let train_set = synthetic_comments(5_000, 7, 0.1);
    let tree = train(&train_set, &TreeParams::default(), &registry).unwrap();

    let mut group = c.benchmark_group("component/classify/batch");
    for n_records in [1_000usize, 50_000] {
        let records = synthetic_comments(n_records, 8, 0.1);
        group.throughput(Throughput::Elements(n_records as u64));

        for (label, parallelism) in [
            ("sequential", Parallelism::Sequential),
            ("parallel", Parallelism::Parallel),
        ] {
            let classifier = Classifier::new(&tree).with_parallelism(parallelism);
            group.bench_with_input(BenchmarkId::new(label, n_records), &records, |b, records| {
                b.iter(|| black_box(classifier.accuracy(black_box(records))))
            });
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_classify
}
criterion_main!(benches);
