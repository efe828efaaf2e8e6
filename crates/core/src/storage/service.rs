//! Storage facade.

use std::path::Path;

use tracing::info;

use super::backend::StorageBackend;
use super::config::StorageConfig;
use super::error::StorageError;
use super::types::{DeleteOutcome, StorageKey, UploadCandidate};

/// Single entry point for storing review images.
///
/// Exactly one backend is chosen at construction and never changes. Callers
/// replacing an image must `store` the new one first and `delete` the old key
/// only after that succeeded; the facade does not enforce this ordering.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    backend: StorageBackend,
}

impl ImageStorage {
    /// Wrap an already constructed backend.
    #[must_use]
    pub const fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Create the facade from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the backend cannot initialize.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let backend = StorageBackend::from_config(config)?;

        match &backend {
            StorageBackend::Local(local) => {
                info!(backend = "local", root = %local.root().display(), "Image storage ready");
            }
            StorageBackend::ObjectStorage(object) => {
                info!(backend = "s3", bucket = %object.bucket(), "Image storage ready");
            }
        }

        Ok(Self::new(backend))
    }

    /// Validate and persist an upload, returning its key.
    ///
    /// # Errors
    ///
    /// - [`StorageError::EmptyUpload`] / [`StorageError::UnsupportedType`] for
    ///   rejected candidates
    /// - [`StorageError::Unavailable`] when the backend cannot persist
    pub async fn store(&self, candidate: UploadCandidate) -> Result<StorageKey, StorageError> {
        self.backend.store(candidate).await
    }

    /// Remove a stored object. Idempotent and never fails.
    pub async fn delete(&self, key: &StorageKey) -> DeleteOutcome {
        self.backend.delete(key).await
    }

    /// Retrieval URL for a key. Pure string operation.
    #[must_use]
    pub fn url(&self, key: &StorageKey) -> String {
        self.backend.url(key)
    }

    /// Get the storage provider name.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.backend.kind().as_str()
    }

    /// Upload root and URL prefix when files are kept on local disk, so the
    /// HTTP layer can serve them.
    #[must_use]
    pub fn local_mount(&self) -> Option<(&Path, &str)> {
        self.backend.local_mount()
    }
}
