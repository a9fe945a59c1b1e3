//! `cb-spatial` — terrain, routing, and the pathfinder contract.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`terrain`]    | `Tile`, `Terrain` trait, `TerrainGrid`                      |
//! | [`pathfinder`] | `Pathfinder` trait, `RouteRequest`, `Route`, `CostWeighting`, `GridPathfinder` |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                          |

pub mod error;
pub mod pathfinder;
pub mod terrain;


pub use error::{SpatialError, SpatialResult};
pub use pathfinder::{CostWeighting, GridPathfinder, Pathfinder, Route, RouteRequest};
pub use terrain::{Terrain, TerrainGrid, Tile};
