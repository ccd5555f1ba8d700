//! # Key Function
//!
//! Maps message bytes to a shard. Equal messages must have equal keys;
//! distinct messages may collide freely.

use crate::errors::ShardKey;

/// Compute the shard key for a message: byte sum modulo `shard_count`.
///
/// `shard_count` must be in `1..=MAX_SHARD_COUNT`, which `BusConfig::validate`
/// guarantees for every bus.
#[must_use]
pub fn shard_key(msg: &[u8], shard_count: usize) -> ShardKey {
    debug_assert!(shard_count > 0);
    let sum: u64 = msg.iter().map(|b| u64::from(*b)).sum();
    (sum % shard_count as u64) as ShardKey
}
