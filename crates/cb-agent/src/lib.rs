//! `cb-agent` — agent records and the agent arena.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`agent`]   | `Agent`, `Capacity`                                           |
//! | [`memory`]  | `AgentMemory`, `RoleState`, `WorkPhase`, `ScoutPhase`         |
//! | [`store`]   | `AgentStore` (id-keyed arena, deterministic iteration order)  |

pub mod agent;
pub mod memory;
pub mod store;


pub use agent::{Agent, Capacity};
pub use memory::{AgentMemory, RoleState, ScoutPhase, WorkPhase};
pub use store::AgentStore;
