//! # Timestamp Sources
//!
//! A [`Chain`](crate::Chain) captures `created_at` through a [`Clock`] it
//! owns, so tests and demos can run against a deterministic clock while
//! production uses the wall clock.

use chrono::Duration;

use crate::temporal::Timestamp;

/// A source of record creation times.
///
/// Implementations must return non-decreasing instants across calls on the
/// same clock; `created_at` is expected to follow append order.
pub trait Clock {
    /// Capture the timestamp for the record about to be sealed.
    fn now(&mut self) -> Timestamp;
}

/// Wall clock, forced strictly monotonic.
///
/// If the system clock has not advanced past (or has stepped back behind)
/// the last issued instant, the last instant plus one microsecond is issued
/// instead.
#[derive(Debug, Default, Clone)]
pub struct SystemClock {
    last: Option<Timestamp>,
}

impl SystemClock {
    /// A fresh wall clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Timestamp {
        let wall = Timestamp::now();
        let next = match self.last {
            Some(last) if wall <= last => last.saturating_add(Duration::microseconds(1)),
            _ => wall,
        };
        self.last = Some(next);
        next
    }
}

/// Deterministic stepping clock: yields `start`, `start + step`,
/// `start + 2*step`, ...
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Timestamp,
    step: Duration,
}

impl ManualClock {
    /// Clock starting at `start`, advancing by `step` per reading.
    ///
    /// A negative `step` is clamped to zero, giving a frozen clock.
    pub fn new(start: Timestamp, step: Duration) -> Self {
        Self {
            next: start,
            step: step.max(Duration::zero()),
        }
    }

    /// Clock that always returns `instant`.
    pub fn frozen(instant: Timestamp) -> Self {
        Self::new(instant, Duration::zero())
    }

    /// The instant the next call to [`Clock::now`] will return.
    pub fn peek(&self) -> Timestamp {
        self.next
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Timestamp {
        let current = self.next;
        self.next = current.saturating_add(self.step);
        current
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&mut self) -> Timestamp {
        (**self).now()
    }
}
