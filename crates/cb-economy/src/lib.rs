//! `cb-economy` — source records, carrier flow estimation, and role demand.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ledger`]  | `SourceRecord`, `EconomyLedger`                            |
//! | [`flow`]    | `required_carriers`, `FlowEstimator`                       |
//! | [`demand`]  | `RoomState`, `DemandCalculator`                            |
//! | [`error`]   | `EconomyError`, `EconomyResult<T>`                         |

pub mod demand;
pub mod error;
pub mod flow;
pub mod ledger;

#[cfg(test)]
mod tests;

pub use demand::{DemandCalculator, RoomState};
pub use error::{EconomyError, EconomyResult};
pub use flow::{required_carriers, FlowEstimator};
pub use ledger::{EconomyLedger, SourceRecord};
