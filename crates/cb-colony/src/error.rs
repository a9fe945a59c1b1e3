use thiserror::Error;

use cb_behavior::BehaviorError;
use cb_core::CoreError;
use cb_economy::EconomyError;
use cb_spawn::SpawnError;

#[derive(Debug, Error)]
pub enum ColonyError {
    #[error("colony configuration error: {0}")]
    Config(#[from] CoreError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Economy(#[from] EconomyError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("state store (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ColonyResult<T> = Result<T, ColonyError>;
