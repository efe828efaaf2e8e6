//! Backend selection and dispatch.

use std::path::Path;

use super::config::{BackendKind, StorageConfig, StorageProvider};
use super::error::StorageError;
use super::local::LocalBackend;
use super::object::{ObjectStorageBackend, S3Settings};
use super::types::{DeleteOutcome, StorageKey, UploadCandidate};

/// A concrete strategy for persisting, resolving and removing uploads.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Local filesystem.
    Local(LocalBackend),
    /// Object storage (S3-compatible).
    ObjectStorage(ObjectStorageBackend),
}

impl StorageBackend {
    /// Construct the backend named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the backend cannot initialize.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let StorageConfig { provider, policy } = config;

        match provider {
            StorageProvider::Local { root, url_prefix } => {
                LocalBackend::new(root, url_prefix, policy).map(Self::Local)
            }
            StorageProvider::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
                public_base_url,
                key_prefix,
            } => {
                let settings = S3Settings {
                    bucket,
                    region,
                    endpoint,
                    access_key_id,
                    secret_access_key,
                };
                ObjectStorageBackend::s3(&settings, key_prefix, public_base_url, policy)
                    .map(Self::ObjectStorage)
            }
        }
    }

    /// Which variant is active.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Local(_) => BackendKind::Local,
            Self::ObjectStorage(_) => BackendKind::S3,
        }
    }

    /// Root directory and URL prefix when the local backend is active.
    #[must_use]
    pub fn local_mount(&self) -> Option<(&Path, &str)> {
        match self {
            Self::Local(local) => Some((local.root(), local.url_prefix())),
            Self::ObjectStorage(_) => None,
        }
    }

    /// Persist a candidate and return its new key.
    ///
    /// # Errors
    ///
    /// See [`LocalBackend::store`] and [`ObjectStorageBackend::store`].
    pub async fn store(&self, candidate: UploadCandidate) -> Result<StorageKey, StorageError> {
        match self {
            Self::Local(local) => local.store(candidate).await,
            Self::ObjectStorage(object) => object.store(candidate).await,
        }
    }

    /// Best-effort removal.
    pub async fn delete(&self, key: &StorageKey) -> DeleteOutcome {
        match self {
            Self::Local(local) => local.delete(key).await,
            Self::ObjectStorage(object) => object.delete(key).await,
        }
    }

    /// Retrieval URL for a key.
    #[must_use]
    pub fn url(&self, key: &StorageKey) -> String {
        match self {
            Self::Local(local) => local.url(key),
            Self::ObjectStorage(object) => object.url(key),
        }
    }
}
