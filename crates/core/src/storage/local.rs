//! Local filesystem backend.
//!
//! Files live flat in the root directory, named by their key.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use super::error::StorageError;
use super::key::{ensure_no_traversal, generate_key, with_trailing_slash};
use super::types::{DeleteOutcome, StorageKey, UploadCandidate};
use super::validation::UploadPolicy;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
    url_prefix: String,
    policy: UploadPolicy,
}

impl LocalBackend {
    /// Create the backend, creating `root` and its parents if needed.
    /// `url_prefix` is normalised to end in `/`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the root directory cannot be
    /// created.
    pub fn new(
        root: impl AsRef<Path>,
        url_prefix: impl Into<String>,
        policy: UploadPolicy,
    ) -> Result<Self, StorageError> {
        let root = std::path::absolute(root.as_ref()).map_err(|e| {
            StorageError::configuration(format!(
                "invalid upload directory {}: {e}",
                root.as_ref().display()
            ))
        })?;

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::configuration(format!(
                "cannot create upload directory {}: {e}",
                root.display()
            ))
        })?;

        Ok(Self {
            root,
            url_prefix: with_trailing_slash(url_prefix),
            policy,
        })
    }

    /// Absolute root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix files are served under.
    #[must_use]
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Map a key to a path directly inside the root.
    fn resolve(&self, key: &StorageKey) -> Result<PathBuf, StorageError> {
        ensure_no_traversal(key.as_str())?;

        let mut components = Path::new(key.as_str()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(StorageError::path_traversal(key.as_str())),
        }
    }

    /// Validate, name and write a candidate.
    ///
    /// # Errors
    ///
    /// Returns a rejection for invalid candidates and
    /// [`StorageError::Unavailable`] when the file cannot be written.
    pub async fn store(&self, candidate: UploadCandidate) -> Result<StorageKey, StorageError> {
        self.policy.validate(&candidate)?;

        let key = generate_key("", candidate.filename())?;
        let path = self.resolve(&key)?;

        let written = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => write_or_discard(file, &path, candidate.data()).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            error!(key = %key, error = %e, "Failed to write upload");
            return Err(e.into());
        }

        info!(key = %key, size = candidate.len(), "Stored upload on local disk");
        Ok(key)
    }

    /// Remove the file for `key`. Never fails; problems come back as a warning.
    pub async fn delete(&self, key: &StorageKey) -> DeleteOutcome {
        if key.is_blank() {
            return DeleteOutcome::Completed;
        }

        let path = match self.resolve(key) {
            Ok(path) => path,
            Err(e) => {
                warn!(key = %key, error = %e, "Refusing to delete unsafe key");
                return DeleteOutcome::CompletedWithWarning(e.to_string());
            }
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "Deleted upload from local disk");
                DeleteOutcome::Completed
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DeleteOutcome::Completed,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to delete upload");
                DeleteOutcome::CompletedWithWarning(e.to_string())
            }
        }
    }

    /// URL the file is served under. No existence check.
    #[must_use]
    pub fn url(&self, key: &StorageKey) -> String {
        format!("{}{}", self.url_prefix, key)
    }
}

/// Write `data` and flush. On failure the partially written file at `path`
/// is removed.
async fn write_or_discard<W>(mut file: W, path: &Path, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let result = match file.write_all(data).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if result.is_err() {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
        }
    }

    result
}
