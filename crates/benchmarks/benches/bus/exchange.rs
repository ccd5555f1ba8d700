//! # Exchange Benchmarks
//!
//! Full producer/consumer runs without write delay, so the numbers reflect
//! lock and channel overhead only.
//!
//! - Shard count sweep at 4 pairs: from total collision (1) to wide (256)
//! - Pair count sweep at 256 shards

use bus_benchmarks::utils::workloads;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput};
use shard_bus::{Bus, BusConfig, Exchange};
use std::sync::Arc;
use std::time::Duration;

const PER_PRODUCER: usize = 5_000;

fn bus(shards: usize, pairs: usize) -> Arc<Bus> {
    Arc::new(
        Bus::new(BusConfig {
            shard_count: shards,
            write_delay: Duration::ZERO,
            producers: pairs,
            consumers: pairs,
            ..BusConfig::default()
        })
        .expect("valid benchmark config"),
    )
}

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange");

    group.throughput(Throughput::Elements((4 * PER_PRODUCER) as u64));
    for shards in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::new("shards", shards), &shards, |b, &shards| {
            b.iter_batched(
                || {
                    let bus = bus(shards, 4);
                    let load = workloads(&bus, PER_PRODUCER);
                    (bus, load)
                },
                |(bus, load)| Exchange::new(bus).run(load).expect("exchange completes"),
                BatchSize::PerIteration,
            )
        });
    }

    for pairs in [1usize, 4, 10] {
        group.throughput(Throughput::Elements((pairs * PER_PRODUCER) as u64));
        group.bench_with_input(BenchmarkId::new("pairs", pairs), &pairs, |b, &pairs| {
            b.iter_batched(
                || {
                    let bus = bus(256, pairs);
                    let load = workloads(&bus, PER_PRODUCER);
                    (bus, load)
                },
                |(bus, load)| Exchange::new(bus).run(load).expect("exchange completes"),
                BatchSize::PerIteration,
            )
        });
    }

    group.finish();
}
