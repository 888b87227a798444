//! Cancel-and-restart debouncing.
//!
//! A [`Debouncer`] holds at most one pending call. Triggering it again before
//! the delay elapses stops the pending timer and starts a fresh one, so only
//! the most recent payload is ever delivered.
//!
//! ```
//! use std::time::Duration;
//! use horizon_select_core::{Clock, Debouncer, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut debouncer = Debouncer::new(Duration::from_millis(250));
//!
//! debouncer.trigger(clock.now(), "a");
//! clock.advance(Duration::from_millis(100));
//! debouncer.trigger(clock.now(), "ab");
//!
//! clock.advance(Duration::from_millis(200));
//! assert_eq!(debouncer.poll(clock.now()), None);
//! clock.advance(Duration::from_millis(50));
//! assert_eq!(debouncer.poll(clock.now()), Some("ab"));
//! ```

use std::time::{Duration, Instant};

use crate::logging::targets;
use crate::timer::{TimerId, TimerQueue};

/// Delivers only the last payload of a burst, `delay` after the burst ends.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    timers: TimerQueue<T>,
    pending: Option<TimerId>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: TimerQueue::new(),
            pending: None,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `payload`, replacing any pending one.
    ///
    /// Returns `true` if a pending payload was discarded.
    pub fn trigger(&mut self, now: Instant, payload: T) -> bool {
        let replaced = self.cancel().is_some();
        if replaced {
            tracing::trace!(target: targets::DEBOUNCE, "pending call replaced");
        }
        self.pending = Some(self.timers.start(now, self.delay, payload));
        replaced
    }

    /// Drop the pending payload, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().and_then(|id| self.timers.stop(id).ok())
    }

    /// Whether a payload is waiting for its delay to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some_and(|id| self.timers.is_active(id))
    }

    /// When the pending payload becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.and_then(|id| self.timers.deadline(id))
    }

    /// Take the pending payload if its delay has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (id, payload) = self.timers.take_expired(now).pop()?;
        if self.pending == Some(id) {
            self.pending = None;
        }
        Some(payload)
    }
}
