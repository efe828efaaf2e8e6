//! Process-local review repository.

use dashmap::DashMap;
use uuid::Uuid;

use super::error::ReviewError;
use super::service::ReviewRepository;
use super::types::Review;

/// Review repository backed by a concurrent map. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    reviews: DashMap<Uuid, Review>,
}

impl InMemoryReviewRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: Review) -> Result<Review, ReviewError> {
        self.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewError> {
        Ok(self.reviews.get(&id).map(|r| r.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        let mut reviews: Vec<Review> = self.reviews.iter().map(|r| r.value().clone()).collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn update(&self, review: Review) -> Result<Review, ReviewError> {
        match self.reviews.get_mut(&review.id) {
            Some(mut entry) => {
                *entry = review.clone();
                Ok(review)
            }
            None => Err(ReviewError::not_found(review.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewError> {
        Ok(self.reviews.remove(&id).is_some())
    }
}
