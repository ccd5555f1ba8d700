//! # Bus Configuration
//!
//! Every tunable of a bus run, fixed before construction.
//!
//! All limits have defaults matching the reference workload; `validate`
//! must pass before a [`crate::Bus`] is built.

use crate::errors::BusError;
use crate::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PAIR_COUNT, DEFAULT_SHARD_COUNT,
    DEFAULT_WRITE_DELAY, MAX_SHARD_COUNT,
};
use serde::Serialize;
use std::time::Duration;

/// Bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusConfig {
    /// Number of cells.
    pub shard_count: usize,
    /// Largest accepted message, in bytes.
    pub max_message_size: usize,
    /// Entries each notification channel can hold.
    pub channel_capacity: usize,
    /// Delay held inside every append.
    pub write_delay: Duration,
    /// Producer tasks.
    pub producers: usize,
    /// Consumer tasks. Must equal `producers`.
    pub consumers: usize,
    /// Log every message on both sides.
    pub verbose: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            write_delay: DEFAULT_WRITE_DELAY,
            producers: DEFAULT_PAIR_COUNT,
            consumers: DEFAULT_PAIR_COUNT,
            verbose: false,
        }
    }
}

impl BusConfig {
    /// Check every invariant the bus relies on.
    ///
    /// # Errors
    ///
    /// - `PairCountMismatch` if producers and consumers differ
    /// - `InvalidConfig` for zero or out-of-range sizes
    pub fn validate(&self) -> Result<(), BusError> {
        if self.producers != self.consumers {
            return Err(BusError::PairCountMismatch {
                producers: self.producers,
                consumers: self.consumers,
            });
        }
        if self.producers == 0 {
            return Err(BusError::InvalidConfig(
                "at least one producer/consumer pair is required".to_string(),
            ));
        }
        if self.shard_count == 0 || self.shard_count > MAX_SHARD_COUNT {
            return Err(BusError::InvalidConfig(format!(
                "shard count must be in 1..={MAX_SHARD_COUNT}, got {}",
                self.shard_count
            )));
        }
        if self.channel_capacity == 0 {
            return Err(BusError::InvalidConfig(
                "channel capacity must be non-zero".to_string(),
            ));
        }
        if self.max_message_size == 0 {
            return Err(BusError::InvalidConfig(
                "max message size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of producer/consumer pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.producers
    }
}
