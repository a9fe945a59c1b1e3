//! Spatial-subsystem error type.

use thiserror::Error;

use cb_core::GridCell;

/// Errors produced by `cb-spatial`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: GridCell, to: GridCell },

    #[error("search from {from} to {to} exceeded {ops} operations")]
    OpsExceeded { from: GridCell, to: GridCell, ops: u32 },

    #[error("terrain parse error: {0}")]
    Parse(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
