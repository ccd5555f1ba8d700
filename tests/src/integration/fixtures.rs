//! Shared test fixtures.

use parking_lot::Mutex;
use shard_bus::{
    Bus, BusConfig, Exchange, ExchangeReport, Message, MessageHandler, NotificationEntry, PairId,
    ShardKey,
};
use std::sync::Arc;
use std::time::Duration;

/// One message as seen by a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub pair: PairId,
    pub sequence: u64,
    pub shard_key: ShardKey,
    pub bytes: Vec<u8>,
}

/// Handler recording every delivery, optionally sleeping per message.
#[derive(Default)]
pub struct RecordingHandler {
    deliveries: Mutex<Vec<Delivery>>,
    delay: Duration,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            delay,
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    /// Deliveries of one pair, in the order its consumer processed them.
    pub fn for_pair(&self, pair: PairId) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .iter()
            .filter(|d| d.pair == pair)
            .cloned()
            .collect()
    }
}

impl MessageHandler for RecordingHandler {
    fn handle(&self, pair: PairId, entry: &NotificationEntry, msg: &Message) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.deliveries.lock().push(Delivery {
            pair,
            sequence: entry.sequence,
            shard_key: entry.shard_key,
            bytes: msg.as_bytes().to_vec(),
        });
    }
}

/// Config with no write delay.
pub fn config(shards: usize, pairs: usize, capacity: usize, max_size: usize) -> BusConfig {
    BusConfig {
        shard_count: shards,
        max_message_size: max_size,
        channel_capacity: capacity,
        write_delay: Duration::ZERO,
        producers: pairs,
        consumers: pairs,
        verbose: false,
    }
}

/// Turn per-producer texts into messages for `bus`.
pub fn workloads<S: AsRef<[u8]>>(bus: &Bus, texts: &[Vec<S>]) -> Vec<Vec<Message>> {
    texts
        .iter()
        .map(|producer| {
            producer
                .iter()
                .map(|t| bus.message(t).expect("message within limit"))
                .collect()
        })
        .collect()
}

/// Run an exchange with a recording handler.
pub fn run_recorded(
    config: BusConfig,
    texts: &[Vec<String>],
    handler: Arc<RecordingHandler>,
) -> (Arc<Bus>, ExchangeReport) {
    let bus = Arc::new(Bus::new(config).expect("valid config"));
    let report = Exchange::new(Arc::clone(&bus))
        .with_handler(handler)
        .run(workloads(&bus, texts))
        .expect("exchange completes");
    (bus, report)
}

/// Assert every cell was drained exactly.
pub fn assert_cells_drained(bus: &Bus) {
    for (shard, snap) in bus.cell_snapshots().iter().enumerate() {
        assert_eq!(
            snap.cursor, snap.appended,
            "shard {shard} not fully drained: {snap:?}"
        );
    }
}
