//! # Bus Metrics
//!
//! Lock-free counters shared by every task. Anomaly counters should stay at
//! zero; any non-zero value means a protocol invariant was broken.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters.
#[derive(Debug, Default)]
pub struct BusMetrics {
    appended: AtomicU64,
    read: AtomicU64,
    not_available: AtomicU64,
    unknown_shard: AtomicU64,
    unknown_pair: AtomicU64,
}

impl BusMetrics {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_append(&self) {
        self.appended.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_not_available(&self) {
        self.not_available.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown_shard(&self) {
        self.unknown_shard.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown_pair(&self) {
        self.unknown_pair.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            appended: self.appended.load(Ordering::Relaxed),
            read: self.read.load(Ordering::Relaxed),
            not_available: self.not_available.load(Ordering::Relaxed),
            unknown_shard: self.unknown_shard.load(Ordering::Relaxed),
            unknown_pair: self.unknown_pair.load(Ordering::Relaxed),
        }
    }
}

/// Frozen counter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Successful cell appends.
    pub appended: u64,
    /// Successful cell reads.
    pub read: u64,
    /// Reads that found no message behind a notification.
    pub not_available: u64,
    /// Lookups of a shard key with no cell.
    pub unknown_shard: u64,
    /// Lookups of a pair id with no channel.
    pub unknown_pair: u64,
}

impl MetricsSnapshot {
    /// Sum of all anomaly counters.
    #[must_use]
    pub fn anomalies(&self) -> u64 {
        self.not_available + self.unknown_shard + self.unknown_pair
    }
}
