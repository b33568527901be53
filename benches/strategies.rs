use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use plancache::policy::{Strategy, StrategyKind};
use plancache::traits::EvictionStrategy;

const CAPACITY: usize = 1024;

const KINDS: [StrategyKind; 5] = [
    StrategyKind::Lru,
    StrategyKind::LruK(2),
    StrategyKind::Gds,
    StrategyKind::Gdfs,
    StrategyKind::Random,
];

fn filled(kind: StrategyKind) -> Strategy<u64, u64> {
    let mut cache = Strategy::build_with_seed(kind, CAPACITY, Some(7)).expect("valid strategy");
    for i in 0..CAPACITY as u64 {
        cache
            .set(i, i, 1.0 + (i % 13) as f64, 1.0 + (i % 4) as f64)
            .expect("valid weights");
    }
    cache
}

fn bench_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_hits");
    group.throughput(Throughput::Elements(CAPACITY as u64));
    for kind in KINDS {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || filled(kind),
                |mut cache| {
                    for i in 0..CAPACITY as u64 {
                        black_box(cache.try_get(&black_box(i)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_eviction_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_eviction_churn");
    group.throughput(Throughput::Elements(4096));
    for kind in KINDS {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || filled(kind),
                |mut cache| {
                    for i in 0..4096u64 {
                        let key = black_box(10_000 + i);
                        black_box(cache.set(key, i, 2.0, 3.0).ok());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_shrink");
    group.throughput(Throughput::Elements(CAPACITY as u64 / 2));
    for kind in KINDS {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || filled(kind),
                |mut cache| black_box(cache.resize(CAPACITY / 2).ok()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hits, bench_eviction_churn, bench_resize);
criterion_main!(benches);
