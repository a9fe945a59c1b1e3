//! `cb-mobility` — per-tick occupancy, route caching, and collision-aware movement.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                        |
//! |-------------------|-----------------------------------------------------------------|
//! | [`occupancy`]     | `OccupancySnapshot` — cell → agent map rebuilt every tick       |
//! | [`route_cache`]   | `RouteCache`, `CachedRoute` — per-agent reusable routes         |
//! | [`stuck`]         | `StuckTracker` — failure counters and contested-cell records    |
//! | [`coordinator`]   | `MovementCoordinator` — step selection, swaps, escalation       |
//! | [`error`]         | `MobilityError`, `MobilityResult<T>`                            |
//!
//! # Movement model
//!
//! Agents move one cell per tick.  At most one agent ends a tick on any
//! cell: every accepted step is committed into the tick's occupancy
//! snapshot before the next agent is considered, and two agents may trade
//! cells only when each wants the other's.  Route caches and stuck counters
//! live in [`MobilityState`], which the caller persists between ticks.

pub mod coordinator;
pub mod error;
pub mod occupancy;
pub mod route_cache;
pub mod stuck;

#[cfg(test)]
mod tests;

pub use coordinator::{
    BlockReason, MobilityState, MoveOrder, MoveOutcome, MovementCoordinator, MovementStats,
    TickMovement,
};
pub use error::{MobilityError, MobilityResult};
pub use occupancy::OccupancySnapshot;
pub use route_cache::{CachedRoute, RouteCache, RouteStatus};
pub use stuck::{ContestRecord, StuckTracker};
