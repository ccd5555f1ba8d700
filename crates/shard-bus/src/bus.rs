//! # Bus
//!
//! Fixed set of cells and notification channels, allocated once.
//!
//! Membership never changes after `Bus::new`, so `cell` and `channel` are
//! plain slice lookups. Only the interior of each cell and channel is
//! synchronized.

use crate::cell::{Cell, CellSnapshot};
use crate::channel::NotificationChannel;
use crate::config::BusConfig;
use crate::errors::{BusError, PairId, ShardKey};
use crate::key::shard_key;
use crate::message::Message;
use crate::metrics::BusMetrics;
use tracing::debug;

/// The sharded event bus.
#[derive(Debug)]
pub struct Bus {
    config: BusConfig,
    /// Indexed by shard key.
    cells: Vec<Cell>,
    /// Indexed by pair id.
    channels: Vec<NotificationChannel>,
    metrics: BusMetrics,
}

impl Bus {
    /// Validate the configuration and pre-allocate every cell and channel.
    ///
    /// # Errors
    ///
    /// Any error from [`BusConfig::validate`].
    pub fn new(config: BusConfig) -> Result<Self, BusError> {
        config.validate()?;

        let cells = (0..config.shard_count)
            .map(|_| Cell::new(config.write_delay))
            .collect();
        let channels = (0..config.pair_count())
            .map(|pair| NotificationChannel::new(pair, config.channel_capacity))
            .collect();

        debug!(
            shards = config.shard_count,
            pairs = config.pair_count(),
            capacity = config.channel_capacity,
            write_delay_us = config.write_delay.as_micros() as u64,
            "Bus initialized"
        );

        Ok(Self {
            config,
            cells,
            channels,
            metrics: BusMetrics::new(),
        })
    }

    /// Configuration the bus was built with.
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Number of cells.
    #[must_use]
    pub fn shard_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of producer/consumer pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.channels.len()
    }

    /// Shard key for a message on this bus.
    #[must_use]
    pub fn key(&self, msg: &[u8]) -> ShardKey {
        shard_key(msg, self.cells.len())
    }

    /// Build a message checked against this bus's size limit.
    ///
    /// # Errors
    ///
    /// `BusError::MessageTooLarge` when the payload is over the limit.
    pub fn message(&self, bytes: impl AsRef<[u8]>) -> Result<Message, BusError> {
        Message::new(bytes, self.config.max_message_size)
    }

    /// Cell for a shard key.
    #[must_use]
    pub fn cell(&self, key: ShardKey) -> Option<&Cell> {
        self.cells.get(usize::from(key))
    }

    /// Notification channel for a pair.
    #[must_use]
    pub fn channel(&self, pair: PairId) -> Option<&NotificationChannel> {
        self.channels.get(pair)
    }

    /// Shared counters.
    #[must_use]
    pub fn metrics(&self) -> &BusMetrics {
        &self.metrics
    }

    /// Length/cursor of every cell, in shard order.
    #[must_use]
    pub fn cell_snapshots(&self) -> Vec<CellSnapshot> {
        self.cells.iter().map(Cell::snapshot).collect()
    }

    /// Close every channel. Used to unblock consumers when a run is
    /// abandoned before its producers start.
    pub fn close_all(&self) {
        for channel in &self.channels {
            channel.close();
        }
    }
}
