//! `cb-colony` — the per-tick orchestrator tying every component together.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`builder`]  | `ColonyBuilder` — config validation, seed, behaviour table       |
//! | [`colony`]   | `Colony` — `tick` / `step`                                       |
//! | [`state`]    | `StateStore` — memories, route caches, stuck counters, ledger    |
//! | [`survey`]   | source survey and extractor assignment                           |
//! | [`report`]   | `TickReport`                                                     |
//! | [`observer`] | `ColonyObserver` trait, `NoopObserver`, `LoggingObserver`        |
//! | [`sandbox`]  | `SandboxWorld` (feature `sandbox`)                               |
//! | [`error`]    | `ColonyError`, `ColonyResult<T>`                                 |
//!
//! # Driving a colony
//!
//! ```rust,ignore
//! let colony = ColonyBuilder::new(GridPathfinder::new(terrain)).build()?;
//! let mut state = StateStore::load(path).unwrap_or_default();
//! for t in 0..ticks {
//!     let report = colony.step(Tick(t), &mut host, &mut state, &mut observer)?;
//! }
//! state.save(path)?;
//! ```
//!
//! The host is anything implementing `World + Spawner`.  The colony keeps no
//! state between ticks beyond what it writes into the `StateStore`, so a
//! tick re-run with the same host state and store yields the same commands.

pub mod builder;
pub mod colony;
pub mod error;
pub mod observer;
pub mod report;
pub mod state;
pub mod survey;

#[cfg(any(test, feature = "sandbox"))]
pub mod sandbox;


pub use builder::ColonyBuilder;
pub use colony::Colony;
pub use error::{ColonyError, ColonyResult};
pub use observer::{ColonyObserver, LoggingObserver, NoopObserver};
pub use report::TickReport;
pub use state::StateStore;

#[cfg(any(test, feature = "sandbox"))]
pub use sandbox::SandboxWorld;
