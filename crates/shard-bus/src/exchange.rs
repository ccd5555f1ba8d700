//! # Exchange
//!
//! Runs one producer thread and one consumer thread per pair over a shared
//! bus, then joins them all.
//!
//! Threads are dedicated and named (`producer-{pair}`, `consumer-{pair}`);
//! no pool is shared between pairs. Consumers start first so that no
//! producer ever fills a channel nobody is draining.

use crate::bus::Bus;
use crate::consumer::{Consumer, ConsumerReport, MessageHandler, NoopHandler};
use crate::errors::{BusError, PairId, TaskRole};
use crate::message::Message;
use crate::metrics::MetricsSnapshot;
use crate::producer::{Producer, ProducerReport};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Aggregated outcome of a completed exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeReport {
    /// One entry per pair, in pair order.
    pub producers: Vec<ProducerReport>,
    /// One entry per pair, in pair order.
    pub consumers: Vec<ConsumerReport>,
    /// Bus counters after the join barrier.
    pub metrics: MetricsSnapshot,
    /// Wall time from the first spawn to the last join.
    pub elapsed: Duration,
}

impl ExchangeReport {
    /// Messages appended by all producers.
    #[must_use]
    pub fn total_sent(&self) -> u64 {
        self.producers.iter().map(|p| p.sent).sum()
    }

    /// Messages claimed by all consumers.
    #[must_use]
    pub fn total_read(&self) -> u64 {
        self.consumers.iter().map(|c| c.read).sum()
    }

    /// Protocol anomalies seen during the run.
    #[must_use]
    pub fn anomalies(&self) -> u64 {
        self.metrics.anomalies()
    }

    /// Messages per second over the run.
    #[must_use]
    pub fn throughput(&self) -> u64 {
        throughput(self.total_read(), self.elapsed)
    }
}

/// Messages per second, floored, computed at millisecond resolution.
///
/// Returns 0 when the elapsed time is under one millisecond.
#[must_use]
pub fn throughput(messages: u64, elapsed: Duration) -> u64 {
    let millis = elapsed.as_millis();
    if millis == 0 {
        return 0;
    }
    (u128::from(messages) * 1000 / millis) as u64
}

/// Drives a full run over a bus.
pub struct Exchange {
    bus: Arc<Bus>,
    handler: Arc<dyn MessageHandler>,
}

impl Exchange {
    /// Exchange with the no-op message handler.
    #[must_use]
    pub fn new(bus: Arc<Bus>) -> Self {
        Self {
            bus,
            handler: Arc::new(NoopHandler),
        }
    }

    /// Replace the handler consumers call for each claimed message.
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn MessageHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// The bus this exchange runs over.
    #[must_use]
    pub fn bus(&self) -> &Arc<Bus> {
        &self.bus
    }

    /// Run every pair to completion.
    ///
    /// `workloads[i]` is the ordered message list of producer `i`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the workload count differs from the pair count
    /// - `SpawnFailed` / `TaskPanicked` if a thread could not run to the end
    /// - any error returned by a producer or consumer
    pub fn run(&self, workloads: Vec<Vec<Message>>) -> Result<ExchangeReport, BusError> {
        let pairs = self.bus.pair_count();
        if workloads.len() != pairs {
            return Err(BusError::InvalidConfig(format!(
                "expected {pairs} workloads, got {}",
                workloads.len()
            )));
        }

        let started = Instant::now();

        let mut consumers = Vec::with_capacity(pairs);
        for pair in 0..pairs {
            let consumer =
                Consumer::with_handler(pair, Arc::clone(&self.bus), Arc::clone(&self.handler));
            match spawn(TaskRole::Consumer, pair, move || consumer.run()) {
                Ok(handle) => consumers.push(handle),
                Err(err) => {
                    // Nothing was produced yet; closing lets the started
                    // consumers finish so they can be joined.
                    self.bus.close_all();
                    for (pair, handle) in consumers.into_iter().enumerate() {
                        let _ = join(TaskRole::Consumer, pair, handle);
                    }
                    return Err(err);
                }
            }
        }

        let mut producers = Vec::with_capacity(pairs);
        let mut errors = Vec::new();
        for (pair, messages) in workloads.into_iter().enumerate() {
            let producer = Producer::new(pair, Arc::clone(&self.bus), messages);
            match spawn(TaskRole::Producer, pair, move || producer.run()) {
                Ok(handle) => producers.push(Some(handle)),
                Err(err) => {
                    if let Some(channel) = self.bus.channel(pair) {
                        channel.close();
                    }
                    producers.push(None);
                    errors.push(err);
                }
            }
        }

        debug!(pairs, "All tasks spawned, waiting for completion");

        let mut producer_reports = Vec::with_capacity(pairs);
        for (pair, handle) in producers.into_iter().enumerate() {
            let Some(handle) = handle else { continue };
            match join(TaskRole::Producer, pair, handle) {
                Ok(report) => producer_reports.push(report),
                Err(err) => errors.push(err),
            }
        }

        let mut consumer_reports = Vec::with_capacity(pairs);
        for (pair, handle) in consumers.into_iter().enumerate() {
            match join(TaskRole::Consumer, pair, handle) {
                Ok(report) => consumer_reports.push(report),
                Err(err) => errors.push(err),
            }
        }

        let elapsed = started.elapsed();
        if let Some(err) = root_cause(errors) {
            return Err(err);
        }

        let report = ExchangeReport {
            producers: producer_reports,
            consumers: consumer_reports,
            metrics: self.bus.metrics().snapshot(),
            elapsed,
        };

        if report.anomalies() > 0 {
            error!(
                anomalies = report.anomalies(),
                "Exchange finished with protocol anomalies"
            );
        }
        debug!(
            sent = report.total_sent(),
            read = report.total_read(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Exchange complete"
        );

        Ok(report)
    }
}

/// A panic explains the `ChannelClosed` errors it causes on the other side
/// of the pair, so it wins over them.
fn root_cause(errors: Vec<BusError>) -> Option<BusError> {
    let panicked = errors
        .iter()
        .position(|e| matches!(e, BusError::TaskPanicked { .. }));
    match panicked {
        Some(index) => errors.into_iter().nth(index),
        None => errors.into_iter().next(),
    }
}

type TaskHandle<T> = JoinHandle<Result<T, BusError>>;

fn spawn<T, F>(role: TaskRole, pair: PairId, task: F) -> Result<TaskHandle<T>, BusError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, BusError> + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{role}-{pair}"))
        .spawn(task)
        .map_err(|e| BusError::SpawnFailed {
            role,
            pair,
            reason: e.to_string(),
        })
}

fn join<T>(role: TaskRole, pair: PairId, handle: TaskHandle<T>) -> Result<T, BusError> {
    handle.join().map_err(|_| {
        error!(%role, pair, "Task panicked");
        BusError::TaskPanicked { role, pair }
    })?
}
