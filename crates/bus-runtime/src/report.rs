//! # Run Report
//!
//! Summary printed once every consumer has reached end-of-stream.

use serde::Serialize;
use shard_bus::{throughput, BusConfig, ExchangeReport, MetricsSnapshot};

/// Final figures of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Cells in the bus.
    pub shards: usize,
    /// Producer/consumer pairs.
    pub pairs: usize,
    /// Messages generated across all producers.
    pub messages_total: u64,
    /// Messages claimed by consumers.
    pub reads: u64,
    /// Protocol anomalies.
    pub anomalies: u64,
    /// Wall time of the exchange.
    pub elapsed_ms: u64,
    /// `messages_total` per second, floored. 0 under one millisecond.
    pub rps: u64,
    /// Bus counters.
    pub metrics: MetricsSnapshot,
}

impl RunReport {
    /// Build the report for a finished exchange.
    #[must_use]
    pub fn new(config: &BusConfig, messages_total: u64, exchange: &ExchangeReport) -> Self {
        Self {
            shards: config.shard_count,
            pairs: config.pair_count(),
            messages_total,
            reads: exchange.total_read(),
            anomalies: exchange.anomalies(),
            elapsed_ms: exchange.elapsed.as_millis() as u64,
            rps: throughput(messages_total, exchange.elapsed),
            metrics: exchange.metrics,
        }
    }

    /// Human-readable result lines.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut text = format!("RPS: {}\nTime taken: {} ms\n", self.rps, self.elapsed_ms);
        if self.anomalies > 0 {
            text.push_str(&format!("Anomalies: {}\n", self.anomalies));
        }
        text
    }

    /// Report as a JSON document.
    ///
    /// # Errors
    ///
    /// Serialization failures from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
