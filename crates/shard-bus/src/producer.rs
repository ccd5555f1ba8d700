//! # Producer Task
//!
//! Writes its workload into the cells and notifies the paired consumer.
//!
//! ```text
//! for each message:  key → Cell.append → Channel[pair].push
//! after the last:    Channel[pair].close
//! ```

use crate::bus::Bus;
use crate::channel::{CloseGuard, NotificationEntry};
use crate::errors::{BusError, PairId};
use crate::message::Message;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of a finished producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProducerReport {
    /// Pair the producer ran for.
    pub pair: PairId,
    /// Messages appended and notified.
    pub sent: u64,
    /// Messages skipped because their shard had no cell.
    pub skipped: u64,
    /// Pushes that waited on a full channel.
    pub push_waits: u64,
}

/// Producer side of one pair.
pub struct Producer {
    pair: PairId,
    bus: Arc<Bus>,
    messages: Vec<Message>,
}

impl Producer {
    /// Create a producer for `pair` over an ordered workload.
    #[must_use]
    pub fn new(pair: PairId, bus: Arc<Bus>, messages: Vec<Message>) -> Self {
        Self {
            pair,
            bus,
            messages,
        }
    }

    /// Pair this producer writes for.
    #[must_use]
    pub fn pair(&self) -> PairId {
        self.pair
    }

    /// Publish every message in order, then close the channel.
    ///
    /// # Errors
    ///
    /// - `UnknownPair` if the bus has no channel for this pair
    /// - `ChannelClosed` if the channel was closed by someone else
    pub fn run(self) -> Result<ProducerReport, BusError> {
        let bus = self.bus;
        let pair = self.pair;
        let verbose = bus.config().verbose;

        let Some(channel) = bus.channel(pair) else {
            bus.metrics().record_unknown_pair();
            error!(pair, "Producer has no notification channel");
            return Err(BusError::UnknownPair(pair));
        };
        // Closes exactly once, after the last push or while unwinding.
        let _close = CloseGuard::always(channel);

        debug!(pair, messages = self.messages.len(), "Producer started");

        let mut sent = 0u64;
        let mut skipped = 0u64;
        for (sequence, msg) in self.messages.into_iter().enumerate() {
            let sequence = sequence as u64;
            let key = bus.key(msg.as_bytes());
            let Some(cell) = bus.cell(key) else {
                bus.metrics().record_unknown_shard();
                skipped += 1;
                error!(pair, sequence, key, "Producer resolved a shard with no cell");
                continue;
            };

            if verbose {
                info!("producer[{pair}]: msgNum: {sequence}, busKey: {key}, msg: {msg}");
            }
            cell.append(msg);
            bus.metrics().record_append();

            channel.push(NotificationEntry {
                shard_key: key,
                sequence,
            })?;
            sent += 1;
        }

        debug!(pair, sent, "Producer finished");

        Ok(ProducerReport {
            pair,
            sent,
            skipped,
            push_waits: channel.push_waits(),
        })
    }
}
