use cb_core::SourceId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EconomyError {
    #[error("source {0} has never been surveyed")]
    UnknownSource(SourceId),
}

pub type EconomyResult<T> = Result<T, EconomyError>;
