//! Injected time source.
//!
//! Aggregates in the domain layer never read wall time ambiently; every
//! expiry comparison is driven by a timestamp supplied by the caller. The
//! [`Clock`] trait is the single place orchestrating services obtain that
//! timestamp, which keeps every state machine deterministic and replayable
//! under test.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current time for orchestrating services.
///
/// Implementations must be cheap to call; the domain calls `now()` once per
/// use case and threads the timestamp through every operation.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests.
///
/// Starts at a fixed instant and only moves when `advance` or `set` is
/// called, so expiry windows can be crossed precisely.
///
/// # Example
///
/// ```
/// use keyward_core::{Clock, FixedClock};
/// use chrono::Duration;
///
/// let clock = FixedClock::default();
/// let start = clock.now();
/// clock.advance(Duration::seconds(300));
/// assert_eq!(clock.now() - start, Duration::seconds(300));
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        *self.now.lock() += delta;
    }

    /// Set the clock to an exact instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
