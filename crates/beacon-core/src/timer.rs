#![forbid(unsafe_code)]

//! Deterministic timer queue on a virtual clock.
//!
//! Deadlines are offsets from page start. The host owns the clock and asks
//! the queue for everything due at a given instant, which keeps delayed
//! callbacks reproducible in tests.
//!
//! # Invariants
//!
//! 1. Due entries are returned in deadline order; equal deadlines keep
//!    scheduling order.
//! 2. A cancelled entry is never returned.
//! 3. `drain_due(now)` never returns an entry whose deadline is after `now`.

use std::time::Duration;

/// Handle to a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    deadline: Duration,
    payload: T,
}

/// Queue of payloads waiting for a deadline.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` to fire at `now + delay`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = now.saturating_add(delay);
        // Insert after every entry with deadline <= ours to keep FIFO ties.
        let pos = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(
            pos,
            Entry {
                id,
                deadline,
                payload,
            },
        );
        id
    }

    /// Cancel a scheduled entry. Returns its payload if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos).payload)
    }

    /// Drop every pending entry.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return everything due at `now`, in firing order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<T> {
        let split = self.entries.partition_point(|e| e.deadline <= now);
        self.entries.drain(..split).map(|e| e.payload).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Pending payloads in firing order.
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.payload)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(ms(0), ms(100), "a");
        assert!(q.drain_due(ms(99)).is_empty());
        assert_eq!(q.drain_due(ms(100)), vec!["a"]);
        assert!(q.is_empty());
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(0), ms(300), 3);
        q.schedule(ms(0), ms(100), 1);
        q.schedule(ms(0), ms(200), 2);
        assert_eq!(q.next_deadline(), Some(ms(100)));
        assert_eq!(q.drain_due(ms(1000)), vec![1, 2, 3]);
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(10), ms(90), 'x');
        q.schedule(ms(50), ms(50), 'y');
        q.schedule(ms(0), ms(100), 'z');
        assert_eq!(q.drain_due(ms(100)), vec!['x', 'y', 'z']);
    }

    #[test]
    fn cancel_removes_entry() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(0), ms(10), "a");
        q.schedule(ms(0), ms(10), "b");
        assert_eq!(q.cancel(a), Some("a"));
        assert_eq!(q.cancel(a), None);
        assert_eq!(q.drain_due(ms(10)), vec!["b"]);
    }

    #[test]
    fn ids_are_unique() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(0), ms(1), ());
        let b = q.schedule(ms(0), ms(1), ());
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }

    #[test]
    fn cancel_all_clears() {
        let mut q = TimerQueue::new();
        q.schedule(ms(0), ms(1), 1);
        q.schedule(ms(0), ms(2), 2);
        q.cancel_all();
        assert_eq!(q.len(), 0);
        assert_eq!(q.next_deadline(), None);
    }

    proptest! {
        #[test]
        fn drained_entries_are_due_and_sorted(
            delays in proptest::collection::vec(0u64..500, 0..32),
            now in 0u64..600,
        ) {
            let mut q = TimerQueue::new();
            for (i, d) in delays.iter().enumerate() {
                q.schedule(ms(0), ms(*d), (i, *d));
            }
            let fired = q.drain_due(ms(now));
            prop_assert!(fired.iter().all(|(_, d)| *d <= now));
            prop_assert!(fired.windows(2).all(|w| w[0].1 < w[1].1 || (w[0].1 == w[1].1 && w[0].0 < w[1].0)));
            prop_assert!(q.pending().all(|(_, d)| *d > now));
        }
    }
}
