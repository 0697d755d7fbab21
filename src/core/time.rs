//! Time tracking utilities
//!
//! All `Instant` references are localized here, so that tests can substitute a fake clock.

use std::ops::{Add, Sub};
use std::time::Duration;
#[cfg(not(test))]
use std::time::Instant;

#[cfg(test)]
use sn_fake_clock::FakeClock as Instant;


/// A `Timestamp` represents a temporal pointer to an event, such as a tick
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub struct Timestamp {
    stamp: Instant,
}

impl Timestamp {
    /// Returns a `Timestamp` referencing the current time.
    pub fn now() -> Self {
        Self::from_instant(Instant::now())
    }

    /// Builds a timestamp from an `Instant` value
    pub fn from_instant(instant: Instant) -> Self {
        Self { stamp: instant }
    }

    /// Calculates elapsed time between `self` and `earlier`.
    ///
    /// Returns a zero duration if `earlier` is later than `self`.
    pub fn duration_since(&self, earlier: &Timestamp) -> Duration {
        if earlier.stamp > self.stamp {
            Duration::ZERO
        } else {
            self.stamp.duration_since(earlier.stamp)
        }
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Duration) -> Self::Output {
        Timestamp {
            stamp: self.stamp - rhs,
        }
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp {
            stamp: self.stamp + rhs,
        }
    }
}
