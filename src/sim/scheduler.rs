//! Discrete-event queue with cancellable timers.
//!
//! Events are ordered by `(fire time, scheduling order)`, so two events
//! scheduled for the same instant fire in the order they were scheduled.
//! Cancellation removes the id from the pending set; the heap entry is
//! discarded lazily when it reaches the front.

use crate::sim::time::SimTime;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Handle to a scheduled event. Holding one does not keep the event alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl EventId {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Timer service seen by simulated applications.
pub trait Scheduler<E> {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Fire `event` after `delay` from now.
    fn schedule(&mut self, delay: Duration, event: E) -> EventId;

    /// Cancel a pending event. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, id: EventId) -> bool;

    fn is_pending(&self, id: EventId) -> bool;
}

struct Entry<E> {
    at: SimTime,
    id: EventId,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.id == other.id
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: earliest time, then lowest id, must compare greatest
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Single-threaded event queue driving one simulated timeline.
pub struct EventQueue<E> {
    now: SimTime,
    next_id: u64,
    heap: BinaryHeap<Entry<E>>,
    pending: HashSet<EventId>,
    dispatched: u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            next_id: 0,
            heap: BinaryHeap::new(),
            pending: HashSet::new(),
            dispatched: 0,
        }
    }

    /// Schedule at an absolute time. Times in the past fire at `now`.
    pub fn schedule_at(&mut self, at: SimTime, event: E) -> EventId {
        let at = if at < self.now {
            tracing::warn!("Event scheduled in the past ({} < {}), firing now", at, self.now);
            self.now
        } else {
            at
        };

        let id = EventId(self.next_id);
        self.next_id += 1;
        self.heap.push(Entry { at, id, event });
        self.pending.insert(id);
        id
    }

    /// Fire time of the next live event, skipping cancelled entries.
    pub fn peek_time(&mut self) -> Option<SimTime> {
        self.discard_cancelled();
        self.heap.peek().map(|entry| entry.at)
    }

    /// Remove the next live event and advance the clock to its fire time.
    pub fn pop_next(&mut self) -> Option<(EventId, E)> {
        self.discard_cancelled();
        let entry = self.heap.pop()?;
        self.pending.remove(&entry.id);
        self.now = entry.at;
        self.dispatched += 1;
        Some((entry.id, entry.event))
    }

    /// Number of live (scheduled, not yet fired or cancelled) events.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }

    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.heap.peek() {
            if self.pending.contains(&entry.id) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl<E> Scheduler<E> for EventQueue<E> {
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule(&mut self, delay: Duration, event: E) -> EventId {
        let at = self.now + delay;
        self.schedule_at(at, event)
    }

    fn cancel(&mut self, id: EventId) -> bool {
        self.pending.remove(&id)
    }

    fn is_pending(&self, id: EventId) -> bool {
        self.pending.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_in_time_order() {
        let mut queue = EventQueue::new();
        queue.schedule(Duration::from_millis(30), "c");
        queue.schedule(Duration::from_millis(10), "a");
        queue.schedule(Duration::from_millis(20), "b");

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_next().map(|(_, e)| e)).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(queue.now(), SimTime::from_millis(30));
    }

    #[test]
    fn test_same_time_events_fire_first_scheduled_first() {
        let mut queue = EventQueue::new();
        for i in 0..50 {
            queue.schedule(Duration::from_millis(5), i);
        }

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_next().map(|(_, e)| e)).collect();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancelled_event_never_fires() {
        let mut queue = EventQueue::new();
        let a = queue.schedule(Duration::from_millis(1), "a");
        queue.schedule(Duration::from_millis(2), "b");

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert!(!queue.is_pending(a));
        assert_eq!(queue.pending_count(), 1);

        assert_eq!(queue.peek_time(), Some(SimTime::from_millis(2)));
        assert_eq!(queue.pop_next().map(|(_, e)| e), Some("b"));
        assert!(queue.pop_next().is_none());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut queue = EventQueue::new();
        let a = queue.schedule(Duration::ZERO, ());
        queue.pop_next();
        assert!(!queue.cancel(a));
    }

    #[test]
    fn test_schedule_at_past_fires_now() {
        let mut queue = EventQueue::new();
        queue.schedule_at(SimTime::from_millis(10), 1);
        queue.pop_next();
        queue.schedule_at(SimTime::from_millis(5), 2);
        assert_eq!(queue.peek_time(), Some(SimTime::from_millis(10)));
    }
}
