//! # Cell
//!
//! One shard of the bus: an append-only message log plus a read cursor.
//!
//! ## Locking
//!
//! - `append` takes the write lock, so it never overlaps reads or other
//!   appends on the same shard.
//! - `read_next` takes the read lock, so readers run side by side. The
//!   atomic cursor decides which reader owns which index.
//!
//! The configured write delay is slept while the write lock is held. It
//! stands in for a storage acknowledgement and is meant to be visible to
//! every other writer and reader of the shard.

use crate::message::Message;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Point-in-time view of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellSnapshot {
    /// Messages appended so far.
    pub appended: usize,
    /// Next unclaimed index.
    pub cursor: usize,
}

impl CellSnapshot {
    /// Messages appended but not yet claimed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.appended - self.cursor
    }
}

/// A single shard.
#[derive(Debug)]
pub struct Cell {
    /// Append-only log.
    log: RwLock<Vec<Message>>,
    /// Next index to hand out. Never exceeds `log.len()`.
    cursor: AtomicUsize,
    /// Simulated storage acknowledgement.
    write_delay: Duration,
}

impl Cell {
    /// Create an empty cell.
    #[must_use]
    pub fn new(write_delay: Duration) -> Self {
        Self {
            log: RwLock::new(Vec::new()),
            cursor: AtomicUsize::new(0),
            write_delay,
        }
    }

    /// Append a message at the tail of the log and return its index.
    pub fn append(&self, msg: Message) -> usize {
        let mut log = self.log.write();
        log.push(msg);
        if !self.write_delay.is_zero() {
            thread::sleep(self.write_delay);
        }
        log.len() - 1
    }

    /// Claim the next unread message.
    ///
    /// Returns `None` when every appended message has been claimed. Under
    /// the bus protocol a notification is only sent after its append has
    /// released the write lock, so a consumer following a notification
    /// should never see `None`.
    pub fn read_next(&self) -> Option<Message> {
        self.claim_next().map(|(_, msg)| msg)
    }

    /// Like [`Cell::read_next`], also returning the claimed log index.
    pub fn claim_next(&self) -> Option<(usize, Message)> {
        let log = self.log.read();
        let len = log.len();
        // The length is frozen while the read lock is held, so bounding the
        // increment by it keeps `cursor <= len` for every observer.
        let index = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cursor| {
                (cursor < len).then_some(cursor + 1)
            })
            .ok()?;
        Some((index, log[index].clone()))
    }

    /// Number of appended messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    /// Whether nothing was appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current cursor value.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Consistent length/cursor pair.
    #[must_use]
    pub fn snapshot(&self) -> CellSnapshot {
        let log = self.log.read();
        CellSnapshot {
            appended: log.len(),
            cursor: self.cursor.load(Ordering::Acquire),
        }
    }

    /// Configured write delay.
    #[must_use]
    pub fn write_delay(&self) -> Duration {
        self.write_delay
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
