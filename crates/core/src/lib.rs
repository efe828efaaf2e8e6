//! Core business logic for Reviewbox.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//!
//! # Modules
//!
//! - `storage` - Upload validation, key generation and the local / object storage backends
//! - `review` - Reviews that reference a stored image by key

pub mod review;
pub mod storage;
