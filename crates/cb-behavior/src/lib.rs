//! `cb-behavior` — the host contracts, role behaviours, and task allocation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                              |
//! |---------------|-----------------------------------------------------------------------|
//! | [`world`]     | `WorldQuery` trait and the info records it returns                    |
//! | [`command`]   | `Command`, `CommandResult`, `AgentCommander`, `World`                 |
//! | [`context`]   | `BehaviorContext` — tick, host, movement coordinator                  |
//! | [`model`]     | `RoleBehavior` trait, `BehaviorTable`                                 |
//! | [`roles`]     | Built-in extractor, carrier, sustainer, and scout behaviours          |
//! | [`noop`]      | `NoopBehavior`                                                        |
//! | [`allocator`] | `TaskAllocator`, `ReservationSet`, `AllocationReport`                 |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                                  |
//!
//! # Design notes
//!
//! The colony runs the allocator before any behaviour, so every carrier
//! sees this tick's reservation when its behaviour runs.  Behaviours then
//! run one agent at a time in id order; each movement request is resolved
//! against the occupancy the previous agents left behind.

pub mod allocator;
pub mod command;
pub mod context;
pub mod error;
pub mod model;
pub mod noop;
pub mod roles;
pub mod world;


pub use allocator::{AllocationReport, ReservationSet, TaskAllocator};
pub use command::{AgentCommander, Command, CommandResult, World};
pub use context::{Approach, BehaviorContext};
pub use error::{BehaviorError, BehaviorResult};
pub use model::{BehaviorTable, RoleBehavior};
pub use noop::NoopBehavior;
pub use roles::{CarrierBehavior, ExtractorBehavior, ScoutBehavior, SustainerBehavior};
pub use world::{
    AgentView, DroppedInfo, PickupCandidate, PickupKind, SiteInfo, SourceInfo, StructureInfo,
    StructureKind, WorldQuery,
};
