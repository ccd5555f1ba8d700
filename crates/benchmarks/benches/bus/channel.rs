//! # Notification Channel Benchmarks
//!
//! Streams entries from one thread to another through queues of
//! different capacities. Capacity 1 is the worst case: every push waits.

use criterion::{BenchmarkId, Criterion, Throughput};
use shard_bus::{NotificationChannel, NotificationEntry};
use std::sync::Arc;
use std::thread;

const ENTRIES: u64 = 20_000;

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel");
    group.throughput(Throughput::Elements(ENTRIES));

    for capacity in [1usize, 64, 4096] {
        group.bench_with_input(
            BenchmarkId::new("spsc_stream", capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let channel = Arc::new(NotificationChannel::new(0, capacity));
                    let producer = {
                        let channel = Arc::clone(&channel);
                        thread::spawn(move || {
                            for sequence in 0..ENTRIES {
                                let entry = NotificationEntry {
                                    shard_key: 0,
                                    sequence,
                                };
                                if channel.push(entry).is_err() {
                                    break;
                                }
                            }
                            channel.close();
                        })
                    };
                    let mut popped = 0u64;
                    while channel.pop().is_some() {
                        popped += 1;
                    }
                    let _ = producer.join();
                    assert_eq!(popped, ENTRIES);
                })
            },
        );
    }

    group.finish();
}
