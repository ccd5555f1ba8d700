//! # Shard Bus - Sharded In-Process Event Bus
//!
//! Producers append messages to per-key logs ("cells") and notify their
//! paired consumer, which claims the message back out of the same cell.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐  append   ┌─────────────────────┐  read_next  ┌──────────────┐
//! │ Producer[i]  │ ────────→ │ Cell[key(msg)]      │ ←────────── │ Consumer[i]  │
//! │              │           │ log + cursor + lock │             │              │
//! └──────┬───────┘           └─────────────────────┘             └──────▲───────┘
//!        │ push (key, seq)                                              │ pop
//!        └─────────────────→  NotificationChannel[i]  ──────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Cells and channels are allocated once; lookups take no lock.
//! - A cell's write lock covers the append and the simulated write delay.
//! - A notification is pushed only after its append released the lock, so
//!   the consumer always finds a message to claim.
//! - Each channel has exactly one producer and one consumer.
//! - Protocol anomalies are logged and counted, never retried.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
#![warn(missing_docs)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod cell;
pub mod channel;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod exchange;
pub mod key;
pub mod message;
pub mod metrics;
pub mod producer;

use std::time::Duration;

// Re-export main types
pub use bus::Bus;
pub use cell::{Cell, CellSnapshot};
pub use channel::{NotificationChannel, NotificationEntry, TryPop};
pub use config::BusConfig;
pub use consumer::{Consumer, ConsumerReport, MessageHandler, NoopHandler};
pub use errors::{BusError, PairId, ShardKey, TaskRole};
pub use exchange::{throughput, Exchange, ExchangeReport};
pub use key::shard_key;
pub use message::Message;
pub use metrics::{BusMetrics, MetricsSnapshot};
pub use producer::{Producer, ProducerReport};

/// Default number of cells. More cells allow more concurrent appends.
pub const DEFAULT_SHARD_COUNT: usize = 256;

/// Largest shard count a `ShardKey` can address.
pub const MAX_SHARD_COUNT: usize = ShardKey::MAX as usize + 1;

/// Default maximum message length, in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16;

/// Default entries per notification channel before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4 << 10;

/// Default simulated storage acknowledgement.
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_micros(1);

/// Default producer (and consumer) count.
pub const DEFAULT_PAIR_COUNT: usize = 10;
