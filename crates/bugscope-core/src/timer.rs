#![forbid(unsafe_code)]

//! Deterministic timer queue.
//!
//! [`TimerQueue`] schedules one-shot and repeating timers against a virtual
//! clock that only moves when the owner calls [`pop_due`](TimerQueue::pop_due)
//! or [`advance_to`](TimerQueue::advance_to). Every scheduled timer returns a
//! [`TimerId`] that cancels it.
//!
//! # How it works
//!
//! 1. Components schedule timers tagged with a caller-chosen kind `K`
//! 2. The owner advances time to a deadline by repeatedly popping the earliest
//!    due timer; the clock jumps to that timer's due time before it is handed out
//! 3. Timers scheduled while handling a fired timer are themselves eligible if
//!    they fall before the deadline
//! 4. Repeating timers are rescheduled before they are returned, so a handler
//!    that cancels its own ticker stops it cleanly
//!
//! # Invariants
//!
//! 1. Timers fire in due-time order; ties fire in scheduling order.
//! 2. A cancelled timer never fires, even if it was due.
//! 3. `now()` never decreases.
//! 4. `TimerId`s are never reused within one queue.

use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number, for logging.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub kind: K,
    /// Virtual time the timer was due at.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Entry<K> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    kind: K,
}

/// Virtual-clock timer queue.
///
/// The queue is expected to hold a handful of timers at a time, so it is a
/// plain vector scanned on pop rather than a heap.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<K>>,
}

impl<K: Copy> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy> TimerQueue<K> {
    /// Create an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a one-shot timer `delay` from now.
    pub fn after(&mut self, delay: Duration, kind: K) -> TimerId {
        self.insert(self.now.saturating_add(delay), None, kind)
    }

    /// Schedule a repeating timer whose first firing is `period` from now.
    ///
    /// A zero period is clamped to one nanosecond so the timer cannot fire
    /// twice at the same instant.
    pub fn every(&mut self, period: Duration, kind: K) -> TimerId {
        let period = if period.is_zero() {
            Duration::from_nanos(1)
        } else {
            period
        };
        self.insert(self.now.saturating_add(period), Some(period), kind)
    }

    fn insert(&mut self, due: Duration, period: Option<Duration>, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            period,
            kind,
        });
        id
    }

    /// Cancel a timer. Returns `true` if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Whether `id` is still scheduled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Pop the earliest timer due at or before `deadline`.
    ///
    /// Moves the clock to the timer's due time. Repeating timers are
    /// rescheduled one period later before being returned.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Fired<K>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= deadline)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(idx, _)| idx)?;

        let entry = &self.entries[idx];
        let fired = Fired {
            id: entry.id,
            kind: entry.kind,
            at: entry.due,
        };
        let period = entry.period;
        self.now = self.now.max(fired.at);

        match period {
            Some(period) => {
                self.entries[idx].due = fired.at.saturating_add(period);
            }
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock forward to `deadline` without firing anything.
    ///
    /// Call after draining [`pop_due`](Self::pop_due) for the same deadline.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
