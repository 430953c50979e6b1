//! Elapsed-time accumulator that rate-limits entity movement.

use std::time::Duration;

/// Fires once the accumulated time reaches the configured frequency.
///
/// Several elapsed intervals collapse into a single firing: resetting drops
/// any excess instead of carrying it into the next interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PeriodicTimer {
    frequency: Duration,
    elapsed: Duration,
}

impl PeriodicTimer {
    pub(crate) const fn new(frequency: Duration) -> Self {
        Self {
            frequency,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.elapsed >= self.frequency
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub(crate) fn set_frequency(&mut self, frequency: Duration) {
        self.frequency = frequency;
    }
}
