//! Storage error types

use thiserror::Error;

/// Key–value backend faults.
///
/// These never reach callers of the token or app-info stores; see
/// [`super::fallback::best_effort`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage document is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for stakeadmin_domain::StakeAdminError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
