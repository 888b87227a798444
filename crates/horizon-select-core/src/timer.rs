//! Timer system for Horizon Select.
//!
//! Provides one-shot timers ordered by deadline. Time comes from a [`Clock`]
//! so that the owner decides what "now" means: [`SystemClock`] for real use,
//! [`ManualClock`] for tests that step time explicitly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{TimerError, TimerResult};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

// ============================================================================
// Clocks
// ============================================================================

/// A source of monotonic time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Cloning yields a handle to the same underlying time, so a test can keep a
/// clone while the widget holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a manual clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// A shareable clock handle.
pub type SharedClock = Arc<dyn Clock>;

// ============================================================================
// Timer Queue
// ============================================================================

/// Internal timer data.
#[derive(Debug)]
struct TimerData<T> {
    /// When this timer fires.
    deadline: Instant,
    /// Value handed back when the timer fires.
    payload: T,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// One-shot timers carrying a payload.
///
/// Stopped timers are removed from the slot map immediately; their heap
/// entries are discarded lazily when they reach the front of the queue.
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, TimerData<T>>,
    queue: BinaryHeap<TimerQueueEntry>,
}

impl<T> TimerQueue<T> {
    /// Create an empty timer queue.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires `delay` after `now`.
    pub fn start(&mut self, now: Instant, delay: Duration, payload: T) -> TimerId {
        let deadline = now + delay;
        let id = self.timers.insert(TimerData { deadline, payload });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: deadline,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?delay, "timer started");
        id
    }

    /// Stop and remove a timer, returning its payload.
    pub fn stop(&mut self, id: TimerId) -> TimerResult<T> {
        self.timers
            .remove(id)
            .map(|data| data.payload)
            .ok_or(TimerError::InvalidTimerId)
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// The instant a pending timer fires.
    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.timers.get(id).map(|data| data.deadline)
    }

    /// The instant the earliest pending timer fires, if any.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.discard_stopped();
        self.queue.peek().map(|entry| entry.fire_time)
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_expired(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            // Stopped timers leave a stale heap entry behind.
            let Some(data) = self.timers.remove(entry.id) else {
                continue;
            };

            tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
            fired.push((entry.id, data.payload));
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("active", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let clock = ManualClock::new();
        let mut queue = TimerQueue::new();
        queue.start(clock.now(), Duration::from_millis(30), "late");
        queue.start(clock.now(), Duration::from_millis(10), "early");

        assert!(queue.take_expired(clock.now()).is_empty());
        assert_eq!(queue.next_deadline(), Some(clock.now() + Duration::from_millis(10)));

        clock.advance(Duration::from_millis(50));
        let fired: Vec<_> = queue.take_expired(clock.now()).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert_eq!(queue.active_count(), 0);
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let clock = ManualClock::new();
        let mut queue = TimerQueue::new();
        let id = queue.start(clock.now(), Duration::from_millis(5), 1);

        assert!(queue.is_active(id));
        assert_eq!(queue.stop(id).ok(), Some(1));
        assert!(!queue.is_active(id));
        assert!(matches!(queue.stop(id), Err(TimerError::InvalidTimerId)));

        clock.advance(Duration::from_millis(10));
        assert!(queue.take_expired(clock.now()).is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let clock = ManualClock::new();
        let mut queue = TimerQueue::new();
        queue.start(clock.now(), Duration::from_millis(250), ());

        clock.advance(Duration::from_millis(249));
        assert!(queue.take_expired(clock.now()).is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(queue.take_expired(clock.now()).len(), 1);
    }
}
