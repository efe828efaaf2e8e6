//! Storage error types.

use reviewbox_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload has zero bytes.
    #[error("empty upload")]
    EmptyUpload,

    /// Declared content type is missing or not on the allow-list.
    #[error("unsupported type: {}", .content_type.as_deref().unwrap_or("<none>"))]
    UnsupportedType {
        /// The declared content type, if any.
        content_type: Option<String>,
    },

    /// Key would resolve outside the backend namespace.
    #[error("path traversal attempt: {key}")]
    PathTraversal {
        /// Offending key.
        key: String,
    },

    /// Backend cannot persist or read (disk, permissions, network, service).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Backend cannot be initialized.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an unsupported type error.
    #[must_use]
    pub fn unsupported_type(content_type: Option<&str>) -> Self {
        Self::UnsupportedType {
            content_type: content_type.map(String::from),
        }
    }

    /// Create a path traversal error.
    #[must_use]
    pub fn path_traversal(key: impl Into<String>) -> Self {
        Self::PathTraversal { key: key.into() }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the error stems from the candidate rather than the backend.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyUpload | Self::UnsupportedType { .. } | Self::PathTraversal { .. }
        )
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::EmptyUpload | StorageError::PathTraversal { .. } => {
                Self::Validation(err.to_string())
            }
            StorageError::UnsupportedType { .. } => Self::UnsupportedMediaType(err.to_string()),
            StorageError::Unavailable(_) => Self::ServiceUnavailable(err.to_string()),
            StorageError::Configuration(_) => Self::Internal(err.to_string()),
        }
    }
}
