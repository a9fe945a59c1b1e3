//! Simulation time.
//!
//! The colony advances in discrete ticks.  A tick is processed synchronously
//! end-to-end before the next one begins, so a plain counter is the whole
//! time model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick immediately after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// `true` if `self` directly follows `earlier`.
    #[inline]
    pub fn follows(self, earlier: Tick) -> bool {
        earlier.0.checked_add(1) == Some(self.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
