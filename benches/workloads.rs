mod common;

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use plancache::cache::QueryCache;
use plancache::policy::StrategyKind;
use plancache::registry::CacheRegistry;
use plancache::traits::EvictionStrategy;
use plancache::workload::{PlanProducer, replay};

const UNIVERSE: u64 = 4096;
const CAPACITY: usize = 256;
const TRACE_LEN: usize = 20_000;

/// Read-through loop against one façade, Zipf-skewed keys.
fn bench_read_through(c: &mut Criterion) {
    let trace = common::zipf_trace(UNIVERSE, 1.0, TRACE_LEN, 11);
    let mut group = c.benchmark_group("zipf_read_through");
    group.throughput(Throughput::Elements(TRACE_LEN as u64));

    for kind in [
        StrategyKind::Lru,
        StrategyKind::LruK(2),
        StrategyKind::Gds,
        StrategyKind::Gdfs,
        StrategyKind::Random,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || {
                    (
                        QueryCache::with_seed(kind, CAPACITY, 3).expect("valid strategy"),
                        common::catalog(UNIVERSE),
                    )
                },
                |(mut cache, mut catalog)| {
                    for key in &trace {
                        if cache.try_get(key).is_none() {
                            let plan = catalog.produce(key);
                            black_box(cache.set(*key, plan.value, plan.cost, plan.size).ok());
                        }
                    }
                    black_box(cache.stats())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Full lineup replay, as the comparative evaluation runs it.
fn bench_lineup_replay(c: &mut Criterion) {
    let trace = common::zipf_trace(UNIVERSE, 0.9, TRACE_LEN / 4, 5);
    let mut group = c.benchmark_group("lineup_replay");
    group.throughput(Throughput::Elements(trace.len() as u64));
    group.sample_size(10);

    group.bench_function("standard_lineup", |b| {
        b.iter_batched(
            || {
                (
                    CacheRegistry::standard_lineup(CAPACITY, 3).expect("valid lineup"),
                    common::catalog(UNIVERSE),
                )
            },
            |(mut registry, mut catalog)| {
                black_box(replay(&mut registry, trace.iter().copied(), &mut catalog).ok())
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_read_through, bench_lineup_replay);
criterion_main!(benches);
