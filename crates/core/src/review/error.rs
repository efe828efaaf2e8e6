//! Review error types.

use reviewbox_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Review operation errors.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Review not found.
    #[error("review not found: {0}")]
    NotFound(Uuid),

    /// Image storage failed or rejected the upload.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ReviewError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(id)
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(_) => Self::NotFound(err.to_string()),
            ReviewError::Storage(storage) => storage.into(),
            ReviewError::Repository(_) => Self::Internal(err.to_string()),
        }
    }
}
