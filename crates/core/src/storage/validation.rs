//! Upload validation.
//!
//! The content type check trusts the client-declared MIME type. No magic-byte
//! sniffing is performed, so a file declared as `image/png` is accepted whatever
//! its bytes are. Callers that render stored files must not rely on the
//! declared type for anything security relevant.

use super::error::StorageError;
use super::types::UploadCandidate;

/// Content types accepted by default.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Acceptance rules applied to every candidate before it reaches a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_content_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Replace the content type allow-list.
    #[must_use]
    pub fn with_allowed_content_types(mut self, types: Vec<String>) -> Self {
        self.allowed_content_types = types;
        self
    }

    /// Allowed content types.
    #[must_use]
    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    /// Check if a content type is allowed. Exact, case-sensitive match.
    #[must_use]
    pub fn is_content_type_allowed(&self, content_type: &str) -> bool {
        self.allowed_content_types.iter().any(|t| t == content_type)
    }

    /// Accept or reject a candidate.
    ///
    /// # Errors
    ///
    /// - [`StorageError::EmptyUpload`] when the candidate has no bytes
    /// - [`StorageError::UnsupportedType`] when the declared type is missing or
    ///   not allowed
    pub fn validate(&self, candidate: &UploadCandidate) -> Result<(), StorageError> {
        if candidate.is_empty() {
            return Err(StorageError::EmptyUpload);
        }

        match candidate.content_type() {
            Some(content_type) if self.is_content_type_allowed(content_type) => Ok(()),
            other => Err(StorageError::unsupported_type(other)),
        }
    }
}
