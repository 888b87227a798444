//! Core systems for Horizon Select.
//!
//! This crate provides the foundational pieces the select widget engine is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe notification of value changes and load
//!   completion
//! - **Timers**: A deadline-ordered queue of one-shot timers driven by an
//!   injectable [`Clock`]
//! - **Debouncing**: Cancel-and-restart scheduling on top of the timer queue
//! - **Logging**: `tracing` target names for every subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let changed = Signal::<String>::new();
//! let conn_id = changed.connect(|value| {
//!     println!("selected {value}");
//! });
//!
//! changed.emit("42".to_string());
//! changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_select_core::{Clock, ManualClock, TimerQueue};
//!
//! let clock = ManualClock::new();
//! let mut timers = TimerQueue::new();
//! timers.start(clock.now(), Duration::from_millis(250), "search");
//!
//! clock.advance(Duration::from_millis(250));
//! let fired = timers.take_expired(clock.now());
//! assert_eq!(fired.len(), 1);
//! ```

pub mod debounce;
mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use debounce::Debouncer;
pub use error::{TimerError, TimerResult};
pub use signal::{ConnectionId, Signal};
pub use timer::{Clock, ManualClock, SharedClock, SystemClock, TimerId, TimerQueue};
