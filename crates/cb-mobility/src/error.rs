use cb_core::{AgentId, GridCell};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MobilityError {
    #[error("agent {0} is not in this tick's occupancy snapshot")]
    UnknownAgent(AgentId),

    #[error("cell {cell} is already occupied by {by}")]
    CellOccupied { cell: GridCell, by: AgentId },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
