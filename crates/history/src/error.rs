use dapp_core::SourceError;
use thiserror::Error;

/// Result type for history operations
pub type HistoryResult<T> = std::result::Result<T, HistoryError>;

/// History pipeline errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error(transparent)]
    Source(#[from] SourceError),
}
