//! # Consumer Task
//!
//! Drains the paired notification channel and claims one message per
//! notification from the named cell.
//!
//! A notification whose shard has no cell, or whose cell has nothing left to
//! claim, is a protocol anomaly. It is logged at `error`, counted in
//! [`crate::BusMetrics`] and skipped. There is no retry.

use crate::bus::Bus;
use crate::channel::{CloseGuard, NotificationEntry};
use crate::errors::{BusError, PairId};
use crate::message::Message;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Hook invoked for every message a consumer claims.
pub trait MessageHandler: Send + Sync {
    /// Process one claimed message.
    fn handle(&self, pair: PairId, entry: &NotificationEntry, msg: &Message);
}

/// Handler that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl MessageHandler for NoopHandler {
    fn handle(&self, _pair: PairId, _entry: &NotificationEntry, _msg: &Message) {}
}

impl<F> MessageHandler for F
where
    F: Fn(PairId, &NotificationEntry, &Message) + Send + Sync,
{
    fn handle(&self, pair: PairId, entry: &NotificationEntry, msg: &Message) {
        self(pair, entry, msg)
    }
}

/// Result of a finished consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumerReport {
    /// Pair the consumer ran for.
    pub pair: PairId,
    /// Notifications popped.
    pub received: u64,
    /// Messages claimed and handed to the handler.
    pub read: u64,
    /// Notifications skipped as anomalies.
    pub anomalies: u64,
}

/// Consumer side of one pair.
pub struct Consumer {
    pair: PairId,
    bus: Arc<Bus>,
    handler: Arc<dyn MessageHandler>,
}

impl Consumer {
    /// Create a consumer with the no-op handler.
    #[must_use]
    pub fn new(pair: PairId, bus: Arc<Bus>) -> Self {
        Self::with_handler(pair, bus, Arc::new(NoopHandler))
    }

    /// Create a consumer with a custom handler.
    #[must_use]
    pub fn with_handler(pair: PairId, bus: Arc<Bus>, handler: Arc<dyn MessageHandler>) -> Self {
        Self { pair, bus, handler }
    }

    /// Pair this consumer reads for.
    #[must_use]
    pub fn pair(&self) -> PairId {
        self.pair
    }

    /// Run until the channel reports end-of-stream.
    ///
    /// # Errors
    ///
    /// `UnknownPair` if the bus has no channel for this pair.
    pub fn run(self) -> Result<ConsumerReport, BusError> {
        let bus = &self.bus;
        let pair = self.pair;
        let verbose = bus.config().verbose;

        let Some(channel) = bus.channel(pair) else {
            bus.metrics().record_unknown_pair();
            error!(pair, "Consumer has no notification channel");
            return Err(BusError::UnknownPair(pair));
        };

        let _close = CloseGuard::on_panic(channel);

        debug!(pair, "Consumer started");

        let mut report = ConsumerReport {
            pair,
            received: 0,
            read: 0,
            anomalies: 0,
        };

        while let Some(entry) = channel.pop() {
            report.received += 1;

            let Some(cell) = bus.cell(entry.shard_key) else {
                bus.metrics().record_unknown_shard();
                report.anomalies += 1;
                error!(
                    pair,
                    sequence = entry.sequence,
                    key = entry.shard_key,
                    "Notification names a shard with no cell"
                );
                continue;
            };

            let Some(msg) = cell.read_next() else {
                bus.metrics().record_not_available();
                report.anomalies += 1;
                error!(
                    pair,
                    sequence = entry.sequence,
                    key = entry.shard_key,
                    "Notification with no message to claim"
                );
                continue;
            };

            bus.metrics().record_read();
            report.read += 1;
            if verbose {
                info!(
                    "consumer[{pair}]: msgNum: {}, busKey: {}, msg: {msg}",
                    entry.sequence, entry.shard_key
                );
            }
            self.handler.handle(pair, &entry, &msg);
        }

        debug!(
            pair,
            received = report.received,
            anomalies = report.anomalies,
            "Consumer reached end of stream"
        );
        Ok(report)
    }
}
