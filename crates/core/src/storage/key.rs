//! Storage key generation.
//!
//! Keys have the form `{namespace}{uuid}{extension}` where the extension is
//! copied verbatim from the original filename, starting at its last `.`.
//!
//! The extension is not sanitised. A filename such as `photos.v2/cat` yields
//! the extension `.v2/cat`: the local backend refuses that key as a path
//! traversal, and object storage files it under a nested key.

use uuid::Uuid;

use super::error::StorageError;
use super::types::StorageKey;

/// Extension of `filename`, including the leading dot. Empty when there is none.
#[must_use]
pub fn extract_extension(filename: &str) -> &str {
    filename.rfind('.').map_or("", |idx| &filename[idx..])
}

/// Generate a fresh key for an upload.
///
/// # Errors
///
/// Returns [`StorageError::PathTraversal`] if the generated key contains `..`.
pub fn generate_key(
    namespace: &str,
    original_filename: Option<&str>,
) -> Result<StorageKey, StorageError> {
    let extension = original_filename.map_or("", extract_extension);
    let key = format!("{namespace}{}{extension}", Uuid::new_v4());

    ensure_no_traversal(&key)?;

    Ok(StorageKey::new(key))
}

/// Normalise a namespace or URL prefix so keys append after a `/`.
/// Empty prefixes stay empty.
#[must_use]
pub(crate) fn with_trailing_slash(prefix: impl Into<String>) -> String {
    let mut prefix = prefix.into();
    if !prefix.is_empty() && !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// Reject keys carrying a `..` sequence.
///
/// # Errors
///
/// Returns [`StorageError::PathTraversal`] when `key` contains `..`.
pub fn ensure_no_traversal(key: &str) -> Result<(), StorageError> {
    if key.contains("..") {
        return Err(StorageError::path_traversal(key));
    }
    Ok(())
}
