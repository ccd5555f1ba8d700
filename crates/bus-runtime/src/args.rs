//! # Runtime Arguments
//!
//! Command-line and environment configuration for a `shardbus` run.
//!
//! Every flag has a `SHARDBUS_*` environment override. Defaults reproduce
//! the reference workload: 256 shards, 16-byte messages, 4096-entry
//! channels, 1 µs write delay, 10 pairs, one million messages per producer.

use clap::{Parser, ValueEnum};
use shard_bus::{
    BusConfig, BusError, DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PAIR_COUNT,
    DEFAULT_SHARD_COUNT,
};
use std::time::Duration;

/// Messages each producer sends by default.
pub const DEFAULT_MESSAGES_PER_PRODUCER: usize = 1_000_000;

/// Default write delay in microseconds.
pub const DEFAULT_WRITE_DELAY_US: u64 = 1;

/// Output format of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Progress lines plus `RPS` / `Time taken`.
    Text,
    /// A single JSON document.
    Json,
}

/// Run configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shardbus",
    version,
    about = "Exchange messages between paired producers and consumers over a sharded bus"
)]
pub struct RuntimeArgs {
    /// Number of bus cells.
    #[arg(long, env = "SHARDBUS_SHARDS", default_value_t = DEFAULT_SHARD_COUNT)]
    pub shards: usize,

    /// Largest message accepted, in bytes.
    #[arg(long, env = "SHARDBUS_MAX_MESSAGE_SIZE", default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,

    /// Notification entries buffered per pair before the producer blocks.
    #[arg(long, env = "SHARDBUS_CHANNEL_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Simulated storage acknowledgement held inside each append, in µs.
    #[arg(long, env = "SHARDBUS_WRITE_DELAY_US", default_value_t = DEFAULT_WRITE_DELAY_US)]
    pub write_delay_us: u64,

    /// Producer threads.
    #[arg(long, env = "SHARDBUS_PRODUCERS", default_value_t = DEFAULT_PAIR_COUNT)]
    pub producers: usize,

    /// Consumer threads. Must equal `--producers`.
    #[arg(long, env = "SHARDBUS_CONSUMERS", default_value_t = DEFAULT_PAIR_COUNT)]
    pub consumers: usize,

    /// Messages each producer sends.
    #[arg(
        long,
        env = "SHARDBUS_MESSAGES_PER_PRODUCER",
        default_value_t = DEFAULT_MESSAGES_PER_PRODUCER
    )]
    pub messages_per_producer: usize,

    /// Log every message on both sides of each pair.
    #[arg(short, long, env = "SHARDBUS_VERBOSE")]
    pub verbose: bool,

    /// Seed for message generation. Random when omitted.
    #[arg(long, env = "SHARDBUS_SEED")]
    pub seed: Option<u64>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "SHARDBUS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl RuntimeArgs {
    /// Bus configuration described by these arguments, validated.
    ///
    /// # Errors
    ///
    /// Any error from [`BusConfig::validate`].
    pub fn bus_config(&self) -> Result<BusConfig, BusError> {
        BusConfig::try_from(self)
    }

    /// Messages across all producers.
    #[must_use]
    pub fn messages_total(&self) -> u64 {
        (self.producers as u64).saturating_mul(self.messages_per_producer as u64)
    }
}

impl TryFrom<&RuntimeArgs> for BusConfig {
    type Error = BusError;

    fn try_from(args: &RuntimeArgs) -> Result<Self, Self::Error> {
        let config = BusConfig {
            shard_count: args.shards,
            max_message_size: args.max_message_size,
            channel_capacity: args.channel_capacity,
            write_delay: Duration::from_micros(args.write_delay_us),
            producers: args.producers,
            consumers: args.consumers,
            verbose: args.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}
