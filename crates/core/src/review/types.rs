//! Review types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::StorageKey;

/// Text fields submitted for a review.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewInput {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
}

/// Review domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Key of the attached image, if any.
    pub image_key: Option<StorageKey>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
