//! Time source for fault timestamps.
//!
//! The engine only needs a monotonically non-decreasing millisecond counter.
//! Repeated readings are fine; a reading that goes backwards is clamped by
//! [`FaultBook`](crate::FaultBook) to the last time it observed.
//!
//! Overflow of the counter itself is the clock's business.

use crate::Millis;
#[cfg(any(feature = "std", test))]
use core::cell::Cell;
#[cfg(any(feature = "std", test))]
use std::rc::Rc;

/// Source of the current time in abstract milliseconds.
pub trait Clock {
    /// Current time. Must never be lower than a previous reading.
    fn now_ms(&self) -> Millis;
}

impl<F> Clock for F
where
    F: Fn() -> Millis,
{
    fn now_ms(&self) -> Millis {
        self()
    }
}

/// Settable clock for tests and simulations.
///
/// Clones share the same time, so a test can keep a handle while the
/// [`FaultBook`](crate::FaultBook) owns another.
///
/// ```rust
/// use faultbook::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.set(100);
/// handle.advance(5);
/// assert_eq!(clock.now_ms(), 105);
/// ```
#[cfg(any(feature = "std", test))]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

#[cfg(any(feature = "std", test))]
impl ManualClock {
    /// Create a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `start`.
    #[must_use]
    pub fn starting_at(start: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Set the current time.
    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    /// Move the clock forward by `delta`, saturating at `Millis::MAX`.
    pub fn advance(&self, delta: Millis) {
        self.now.set(self.now.get().saturating_add(delta));
    }
}

#[cfg(any(feature = "std", test))]
impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Monotonic wall clock: milliseconds elapsed since the clock was created.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        Millis::try_from(self.origin.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }
}
