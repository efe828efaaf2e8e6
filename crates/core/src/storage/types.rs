//! Storage data types.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file offered for storage. Lives for the duration of one `store` call.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadCandidate {
    /// Create a candidate with no filename and no declared content type.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the original filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the declared content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Original filename as submitted by the client.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Declared (client-supplied) content type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the candidate has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consume the candidate, keeping only the bytes.
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

/// Opaque identifier of a stored object within a backend's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap a key previously issued by `store` (e.g. loaded from a record).
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Unwrap into the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of a best-effort delete. Neither variant is a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Object removed, or it was already absent.
    Completed,
    /// Removal could not be confirmed; the reason was logged.
    CompletedWithWarning(String),
}

impl DeleteOutcome {
    /// Whether a warning was recorded.
    #[must_use]
    pub const fn has_warning(&self) -> bool {
        matches!(self, Self::CompletedWithWarning(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accessors() {
        let candidate = UploadCandidate::new(vec![1u8, 2, 3])
            .with_filename("cat.png")
            .with_content_type("image/png");
        assert_eq!(candidate.filename(), Some("cat.png"));
        assert_eq!(candidate.content_type(), Some("image/png"));
        assert_eq!(candidate.len(), 3);
        assert!(!candidate.is_empty());
    }

    #[test]
    fn test_candidate_without_metadata() {
        let candidate = UploadCandidate::new(Bytes::new());
        assert!(candidate.is_empty());
        assert_eq!(candidate.filename(), None);
        assert_eq!(candidate.content_type(), None);
    }

    #[test]
    fn test_storage_key_display() {
        let key = StorageKey::new("reviews/abc.png");
        assert_eq!(key.to_string(), "reviews/abc.png");
        assert!(!key.is_blank());
        assert!(StorageKey::new("  ").is_blank());
    }

    #[test]
    fn test_delete_outcome_warning() {
        assert!(!DeleteOutcome::Completed.has_warning());
        assert!(DeleteOutcome::CompletedWithWarning("io".into()).has_warning());
    }
}
