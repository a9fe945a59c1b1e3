use thiserror::Error;

use cb_core::CoreError;
use cb_mobility::MobilityError;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Mobility(#[from] MobilityError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
