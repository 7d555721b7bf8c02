//! Virtual time.

use std::{ops::Sub, time::Duration};

/// Virtual instant: time elapsed since the simulation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Simulation start.
    pub const START: Self = Self(Duration::ZERO);

    /// The instant `elapsed` after the start.
    pub fn from_start(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    /// Time since the start.
    pub fn elapsed(self) -> Duration {
        self.0
    }

    /// This instant moved forward by `step`.
    #[must_use]
    pub fn advance(self, step: Duration) -> Self {
        Self(self.0 + step)
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}
