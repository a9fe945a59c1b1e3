//! `cb-spawn` — deciding what to produce next, and with which loadout.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`loadout`]    | `Part`, `Loadout`, `TierTable`, `LoadoutComposer`            |
//! | [`loader`]     | `load_tiers_csv` / `load_tiers_reader` — CSV tier overrides  |
//! | [`scheduler`]  | `SlotState`, `SpawnScheduler` — priority + bootstrap override |
//! | [`planner`]    | `Spawner` trait, `SpawnPlanner`, `SpawnOrder`, `SpawnOutcome` |
//! | [`error`]      | `SpawnError`, `SpawnResult<T>`                               |
//!
//! # Per-tick flow
//!
//! ```text
//! desired, actual ──▶ SpawnScheduler::select ──▶ role
//!                                                  │
//!       energy ──────▶ LoadoutComposer::compose ◀──┘
//!                                │
//!                                ▼
//!                       Spawner::produce(role, loadout)
//! ```

pub mod error;
pub mod loader;
pub mod loadout;
pub mod planner;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{SpawnError, SpawnResult};
pub use loader::{load_tiers_csv, load_tiers_reader};
pub use loadout::{Loadout, LoadoutComposer, Part, TierTable};
pub use planner::{SpawnOrder, SpawnOutcome, SpawnPlanner, Spawner};
pub use scheduler::{SlotState, SpawnScheduler};
