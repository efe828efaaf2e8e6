//! Reviews with an optional image attachment.
//!
//! Review text lives in a [`ReviewRepository`]; the image lives in
//! [`ImageStorage`](crate::storage::ImageStorage) and the record keeps only its key.

mod error;
mod memory;
mod service;
mod types;

pub use error::ReviewError;
pub use memory::InMemoryReviewRepository;
pub use service::{ReviewRepository, ReviewService};
pub use types::{Review, ReviewInput};
