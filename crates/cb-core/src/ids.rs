//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Ordering matters: every per-tick
//! pass walks agents in ascending `AgentId` order, and that order decides who
//! wins a contested cell or pickup target.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identity of a mobile agent.  Stable for the agent's lifetime and never
    /// reused while the colony runs.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identity of a resource node (an energy source).
    pub struct SourceId(u32);
}

typed_id! {
    /// Identity of a pickup or delivery target: a structure or a pile of
    /// ground-dropped resource.
    pub struct TargetId(u32);
}

typed_id! {
    /// Identity of a grid region (one square room of the world).
    pub struct RegionId(u16);
}
