use cb_core::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("tier table parse error: {0}")]
    Parse(String),

    #[error("invalid tier table for {role}: {reason}")]
    InvalidTiers { role: Role, reason: String },

    #[error("{role} tier declares cost {declared} but its parts cost {computed}")]
    CostMismatch { role: Role, declared: u32, computed: u32 },

    #[error("not enough energy: need {needed}, have {available}")]
    NotEnoughEnergy { needed: u32, available: u32 },

    #[error("spawn slot is busy")]
    Busy,

    #[error("spawn rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpawnResult<T> = Result<T, SpawnError>;
