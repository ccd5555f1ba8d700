//! # Bus Errors
//!
//! Error types for bus construction and task execution.

use std::fmt;
use thiserror::Error;

/// Shard index produced by the key function.
pub type ShardKey = u16;

/// Identifier of a producer/consumer pair.
pub type PairId = usize;

/// Which side of a pair a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    /// Appends messages and pushes notifications.
    Producer,
    /// Pops notifications and claims messages.
    Consumer,
}

impl fmt::Display for TaskRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRole::Producer => f.write_str("producer"),
            TaskRole::Consumer => f.write_str("consumer"),
        }
    }
}

/// Bus error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Producer and consumer counts differ.
    #[error("Producers must be equal to Consumers: {producers} != {consumers}")]
    PairCountMismatch {
        /// Configured producers
        producers: usize,
        /// Configured consumers
        consumers: usize,
    },

    /// A message exceeds the configured maximum size.
    #[error("Bad message size: {len} (max {max})")]
    MessageTooLarge {
        /// Message length in bytes
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No cell exists for the shard key.
    #[error("Unknown shard: {0}")]
    UnknownShard(ShardKey),

    /// No notification channel exists for the pair.
    #[error("Unknown pair: {0}")]
    UnknownPair(PairId),

    /// Push attempted on a channel that was already closed.
    #[error("Notification channel closed for pair {0}")]
    ChannelClosed(PairId),

    /// The OS refused to start a task thread.
    #[error("Failed to spawn {role} task for pair {pair}: {reason}")]
    SpawnFailed {
        /// Task side
        role: TaskRole,
        /// Pair of the task
        pair: PairId,
        /// OS error text
        reason: String,
    },

    /// A task thread panicked before reporting.
    #[error("{role} task for pair {pair} panicked")]
    TaskPanicked {
        /// Task side
        role: TaskRole,
        /// Pair of the task
        pair: PairId,
    },
}
