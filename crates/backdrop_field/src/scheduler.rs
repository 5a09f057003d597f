//! # Respawn Scheduler
//!
//! A min-priority queue of one-shot timers keyed by simulated instant.
//!
//! ## Design
//!
//! A particle's end of life is a deferred callback that, when it fires,
//! registers the next one. Instead of nesting those callbacks, every pending
//! timer is an entry in this queue and a single dispatch loop pops due
//! entries:
//!
//! ```text
//!   spawn ──> schedule(expires_at) ──> [ heap ] ──> pop_due(now) ──> respawn
//!     ^                                                                │
//!     └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The queue length is the number of pending timers, always inspectable.
//! Entries due at the same instant fire in the order they were scheduled.

use backdrop_core::SimInstant;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pending timer.
#[derive(Clone, Debug)]
pub struct Timer<T> {
    /// When the timer fires.
    pub fire_at: SimInstant,
    /// Insertion order, breaks ties between equal `fire_at`.
    pub sequence: u64,
    /// What the timer carries.
    pub payload: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.sequence == other.sequence
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    // Reversed so the max-heap yields the earliest timer first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Timer queue.
#[derive(Debug)]
pub struct Scheduler<T> {
    heap: BinaryHeap<Timer<T>>,
    next_sequence: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Creates an empty queue with room for `capacity` timers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Registers a timer firing at `fire_at`.
    pub fn schedule(&mut self, fire_at: SimInstant, payload: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Timer {
            fire_at,
            sequence,
            payload,
        });
    }

    /// Pops the earliest timer if it is due at or before `now`.
    pub fn pop_due(&mut self, now: SimInstant) -> Option<Timer<T>> {
        if self.heap.peek()?.fire_at <= now {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Instant of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<SimInstant> {
        self.heap.peek().map(|timer| timer.fire_at)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Discards every pending timer, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let discarded = self.heap.len();
        self.heap.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::SimDuration;

    fn at(secs: u64) -> SimInstant {
        SimInstant::ZERO + SimDuration::from_secs(secs)
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(at(30), "c");
        scheduler.schedule(at(10), "a");
        scheduler.schedule(at(20), "b");

        let order: Vec<&str> = std::iter::from_fn(|| scheduler.pop_due(at(100)))
            .map(|timer| timer.payload)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut scheduler = Scheduler::new();
        for label in ["first", "second", "third"] {
            scheduler.schedule(at(5), label);
        }

        assert_eq!(scheduler.pop_due(at(5)).unwrap().payload, "first");
        assert_eq!(scheduler.pop_due(at(5)).unwrap().payload, "second");
        assert_eq!(scheduler.pop_due(at(5)).unwrap().payload, "third");
    }

    #[test]
    fn test_not_due_stays_queued() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(at(10), ());

        assert!(scheduler.pop_due(at(9)).is_none());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(at(10)));
        assert!(scheduler.pop_due(at(10)).is_some());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_clear_reports_discarded() {
        let mut scheduler = Scheduler::with_capacity(4);
        scheduler.schedule(at(1), 1);
        scheduler.schedule(at(2), 2);

        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.next_due().is_none());
    }
}
