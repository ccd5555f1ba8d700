//! # Workload Generation
//!
//! Builds every producer's message list before the run starts, so message
//! creation and size checks never overlap the timed exchange.

use rand::Rng;
use shard_bus::{Bus, BusError, Message, ShardKey};
use std::collections::HashSet;

/// One random message: `m_<0..1000>_<0..1000>_<0..1000>`.
pub fn message_text<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "m_{}_{}_{}",
        rng.gen_range(0..1000),
        rng.gen_range(0..1000),
        rng.gen_range(0..1000)
    )
}

/// Ordered messages for every producer.
#[derive(Debug, Clone, Default)]
pub struct Workload {
    messages: Vec<Vec<Message>>,
}

impl Workload {
    /// Generate `per_producer` random messages for each of `producers`.
    ///
    /// # Errors
    ///
    /// `BusError::MessageTooLarge` for the first message over `max_size`.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        producers: usize,
        per_producer: usize,
        max_size: usize,
    ) -> Result<Self, BusError> {
        let messages = (0..producers)
            .map(|_| {
                (0..per_producer)
                    .map(|_| Message::new(message_text(rng), max_size))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { messages })
    }

    /// Workload from explicit texts, one list per producer.
    ///
    /// # Errors
    ///
    /// `BusError::MessageTooLarge` for the first text over `max_size`.
    pub fn from_texts<S: AsRef<[u8]>>(
        texts: &[Vec<S>],
        max_size: usize,
    ) -> Result<Self, BusError> {
        let messages = texts
            .iter()
            .map(|producer| {
                producer
                    .iter()
                    .map(|text| Message::new(text, max_size))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { messages })
    }

    /// Number of producers covered.
    #[must_use]
    pub fn producers(&self) -> usize {
        self.messages.len()
    }

    /// Messages across all producers.
    #[must_use]
    pub fn total(&self) -> usize {
        self.messages.iter().map(Vec::len).sum()
    }

    /// Messages of one producer.
    #[must_use]
    pub fn producer(&self, pair: usize) -> Option<&[Message]> {
        self.messages.get(pair).map(Vec::as_slice)
    }

    /// Shard key of every message, per producer.
    #[must_use]
    pub fn keys(&self, bus: &Bus) -> Vec<Vec<ShardKey>> {
        self.messages
            .iter()
            .map(|producer| producer.iter().map(|m| bus.key(m.as_bytes())).collect())
            .collect()
    }

    /// Distinct shards the workload touches.
    #[must_use]
    pub fn shard_spread(&self, bus: &Bus) -> usize {
        self.keys(bus)
            .into_iter()
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }

    /// Hand the per-producer lists to an exchange.
    #[must_use]
    pub fn into_inner(self) -> Vec<Vec<Message>> {
        self.messages
    }
}
