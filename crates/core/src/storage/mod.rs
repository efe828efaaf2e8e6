//! Storage layer for review images.
//!
//! Validates uploads, derives collision-resistant keys and persists bytes on
//! exactly one backend chosen at startup:
//! - Local filesystem: flat directory, files served under `/images/`
//! - S3-compatible object storage via Apache OpenDAL
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   store / delete / url   ┌────────────────────────────┐
//! │ review layer │ ───────────────────────▶ │ ImageStorage (facade)      │
//! └──────────────┘                          ├────────────────────────────┤
//!                                           │ UploadPolicy::validate     │
//!                                           │ key::generate_key          │
//!                                           ├──────────────┬─────────────┤
//!                                           │ LocalBackend │ ObjectStor. │
//!                                           └──────────────┴─────────────┘
//! ```

mod backend;
mod config;
mod error;
mod key;
mod local;
mod object;
mod service;
mod types;
mod validation;

pub use backend::StorageBackend;
pub use config::{BackendKind, StorageConfig, StorageProvider};
pub use error::StorageError;
pub use key::{extract_extension, generate_key};
pub use local::LocalBackend;
pub use object::{ObjectStorageBackend, S3Settings};
pub use service::ImageStorage;
pub use types::{DeleteOutcome, StorageKey, UploadCandidate};
pub use validation::{DEFAULT_ALLOWED_CONTENT_TYPES, UploadPolicy};
