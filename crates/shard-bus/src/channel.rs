//! # Notification Channel
//!
//! Bounded FIFO linking one producer to its paired consumer.
//!
//! A full queue blocks `push`; this is the only backpressure in the system.
//! An empty, open queue blocks `pop`. Once closed and drained, `pop` returns
//! `None` immediately, forever.

use crate::errors::{BusError, PairId, ShardKey};
use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// Signal that a message was appended to a shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NotificationEntry {
    /// Shard the message was appended to.
    pub shard_key: ShardKey,
    /// Producer-local ordinal of the message. Diagnostic only.
    pub sequence: u64,
}

/// Outcome of a non-blocking pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPop {
    /// Oldest queued entry.
    Entry(NotificationEntry),
    /// Queue empty but producer still running.
    Empty,
    /// Queue closed and drained.
    EndOfStream,
}

#[derive(Debug)]
struct ChannelState {
    queue: VecDeque<NotificationEntry>,
    closed: bool,
}

/// Per-pair notification channel.
#[derive(Debug)]
pub struct NotificationChannel {
    pair: PairId,
    capacity: usize,
    state: Mutex<ChannelState>,
    not_empty: Condvar,
    not_full: Condvar,
    /// Entries accepted over the channel lifetime.
    pushed: AtomicU64,
    /// Times a push had to wait for room.
    push_waits: AtomicU64,
}

impl NotificationChannel {
    /// Create an open channel holding at most `capacity` entries.
    ///
    /// `capacity` must be non-zero; a zero-capacity queue could never accept
    /// an entry.
    #[must_use]
    pub fn new(pair: PairId, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            pair,
            capacity,
            state: Mutex::new(ChannelState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            pushed: AtomicU64::new(0),
            push_waits: AtomicU64::new(0),
        }
    }

    /// Enqueue an entry, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// `BusError::ChannelClosed` if the channel is (or becomes) closed
    /// before room is available.
    pub fn push(&self, entry: NotificationEntry) -> Result<(), BusError> {
        let mut state = self.state.lock();
        let mut waited = false;
        loop {
            if state.closed {
                return Err(BusError::ChannelClosed(self.pair));
            }
            if state.queue.len() < self.capacity {
                break;
            }
            if !waited {
                waited = true;
                self.push_waits.fetch_add(1, Ordering::Relaxed);
            }
            self.not_full.wait(&mut state);
        }

        state.queue.push_back(entry);
        self.pushed.fetch_add(1, Ordering::Relaxed);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Dequeue the oldest entry, blocking while empty and open.
    ///
    /// Returns `None` once the channel is closed and drained.
    pub fn pop(&self) -> Option<NotificationEntry> {
        let mut state = self.state.lock();
        loop {
            if let Some(entry) = state.queue.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(entry);
            }
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Dequeue without blocking.
    pub fn try_pop(&self) -> TryPop {
        let mut state = self.state.lock();
        match state.queue.pop_front() {
            Some(entry) => {
                drop(state);
                self.not_full.notify_one();
                TryPop::Entry(entry)
            }
            None if state.closed => TryPop::EndOfStream,
            None => TryPop::Empty,
        }
    }

    /// Mark the channel closed and wake every waiter.
    ///
    /// Idempotent. Returns `true` only for the call that closed it.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        drop(state);

        self.not_empty.notify_all();
        self.not_full.notify_all();
        true
    }

    /// Pair this channel belongs to.
    #[must_use]
    pub fn pair(&self) -> PairId {
        self.pair
    }

    /// Maximum queued entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Whether the queue is empty right now.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Total entries accepted.
    #[must_use]
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    /// Pushes that found the queue full.
    #[must_use]
    pub fn push_waits(&self) -> u64 {
        self.push_waits.load(Ordering::Relaxed)
    }
}

/// Closes a channel when a task exits.
///
/// Producers close on every exit. Consumers only close while unwinding, so
/// a producer blocked on a full queue is released instead of waiting on a
/// reader that is gone.
pub(crate) struct CloseGuard<'a> {
    channel: &'a NotificationChannel,
    always: bool,
}

impl<'a> CloseGuard<'a> {
    pub(crate) fn always(channel: &'a NotificationChannel) -> Self {
        Self {
            channel,
            always: true,
        }
    }

    pub(crate) fn on_panic(channel: &'a NotificationChannel) -> Self {
        Self {
            channel,
            always: false,
        }
    }
}

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        if self.always || thread::panicking() {
            self.channel.close();
        }
    }
}
