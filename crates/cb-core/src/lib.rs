//! `cb-core` — foundational types for the colony bot.
//!
//! This crate is a dependency of every other `cb-*` crate and has no `cb-*`
//! dependencies itself.
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `SourceId`, `TargetId`, `RegionId`              |
//! | [`grid`]   | `GridCell`, `Direction`, `REGION_SIZE`                     |
//! | [`time`]   | `Tick`                                                     |
//! | [`role`]   | `Role`, `RoleMap<T>`                                       |
//! | [`rng`]    | `AgentRng` (per agent, per tick), `entropy_seed`           |
//! | [`config`] | `ColonyConfig` and its policy sections                     |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod role;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    BootstrapTrigger, ColonyConfig, DemandPolicy, EconomyPolicy, EnergyTier, MovementPolicy,
    RolePriorities, SpawnPolicy,
};
pub use error::{CoreError, CoreResult};
pub use grid::{Direction, GridCell, REGION_SIZE};
pub use ids::{AgentId, RegionId, SourceId, TargetId};
pub use rng::{entropy_seed, AgentRng};
pub use role::{Role, RoleMap};
pub use time::Tick;
