//! # Cell Benchmarks
//!
//! - Uncontended append/read pairs
//! - Four readers draining one pre-filled cell

use criterion::{black_box, BatchSize, Criterion, Throughput};
use shard_bus::{Cell, Message};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DRAIN_SIZE: usize = 10_000;

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell");
    let msg = Message::new("m_123_456_789", 16).expect("fits");

    group.throughput(Throughput::Elements(1));
    group.bench_function("append_then_read", |b| {
        let cell = Cell::new(Duration::ZERO);
        b.iter(|| {
            cell.append(black_box(msg.clone()));
            black_box(cell.read_next())
        })
    });

    group.throughput(Throughput::Elements(DRAIN_SIZE as u64));
    group.bench_function("drain_4_readers", |b| {
        b.iter_batched(
            || {
                let cell = Arc::new(Cell::new(Duration::ZERO));
                for _ in 0..DRAIN_SIZE {
                    cell.append(msg.clone());
                }
                cell
            },
            |cell| {
                let readers: Vec<_> = (0..4)
                    .map(|_| {
                        let cell = Arc::clone(&cell);
                        thread::spawn(move || {
                            let mut n = 0usize;
                            while cell.read_next().is_some() {
                                n += 1;
                            }
                            n
                        })
                    })
                    .collect();
                let total: usize = readers.into_iter().map(|h| h.join().unwrap_or(0)).sum();
                assert_eq!(total, DRAIN_SIZE);
            },
            BatchSize::PerIteration,
        )
    });

    group.finish();
}
