//! Review service implementation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::ReviewError;
use super::types::{Review, ReviewInput};
use crate::storage::{DeleteOutcome, ImageStorage, StorageKey, UploadCandidate};

/// Repository trait for review persistence.
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review.
    fn insert(
        &self,
        review: Review,
    ) -> impl std::future::Future<Output = Result<Review, ReviewError>> + Send;

    /// Find review by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Review>, ReviewError>> + Send;

    /// List all reviews, newest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Review>, ReviewError>> + Send;

    /// Replace an existing review.
    fn update(
        &self,
        review: Review,
    ) -> impl std::future::Future<Output = Result<Review, ReviewError>> + Send;

    /// Delete review by ID. Returns whether it existed.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, ReviewError>> + Send;
}

/// Review service coordinating records and their images.
pub struct ReviewService<R: ReviewRepository> {
    storage: Arc<ImageStorage>,
    repo: Arc<R>,
}

impl<R: ReviewRepository> ReviewService<R> {
    /// Create a new review service.
    #[must_use]
    pub fn new(storage: Arc<ImageStorage>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Store the image (if one was actually submitted) and return its key.
    async fn store_image(
        &self,
        image: Option<UploadCandidate>,
    ) -> Result<Option<StorageKey>, ReviewError> {
        // A file input left blank arrives as an empty part.
        match image.filter(|candidate| !candidate.is_empty()) {
            Some(candidate) => Ok(Some(self.storage.store(candidate).await?)),
            None => Ok(None),
        }
    }

    /// Create a review, storing its image first.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is rejected or cannot be stored, or the
    /// record cannot be saved. In the latter case the stored image is removed.
    pub async fn create(
        &self,
        input: ReviewInput,
        image: Option<UploadCandidate>,
    ) -> Result<Review, ReviewError> {
        let image_key = self.store_image(image).await?;
        let now = Utc::now();

        let review = Review {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            image_key: image_key.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.repo.insert(review).await {
            Ok(review) => {
                info!(
                    review_id = %review.id,
                    has_image = review.image_key.is_some(),
                    "Review created"
                );
                Ok(review)
            }
            Err(e) => {
                if let Some(key) = &image_key {
                    self.storage.delete(key).await;
                }
                Err(e)
            }
        }
    }

    /// Get review by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if review not found or repository operation fails.
    pub async fn get(&self, id: Uuid) -> Result<Review, ReviewError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReviewError::not_found(id))
    }

    /// List reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if repository operation fails.
    pub async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        self.repo.list().await
    }

    /// Update review text and optionally replace its image.
    ///
    /// The new image is stored and the record saved before the old image is
    /// deleted, so a failure never leaves the review pointing at nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if review not found, the new image is rejected or
    /// cannot be stored, or the record cannot be saved.
    pub async fn update(
        &self,
        id: Uuid,
        input: ReviewInput,
        image: Option<UploadCandidate>,
    ) -> Result<Review, ReviewError> {
        let mut review = self.get(id).await?;
        let new_key = self.store_image(image).await?;

        let old_key = match &new_key {
            Some(key) => review.image_key.replace(key.clone()),
            None => None,
        };
        review.title = input.title;
        review.content = input.content;
        review.updated_at = Utc::now();

        let saved = match self.repo.update(review).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(key) = &new_key {
                    self.storage.delete(key).await;
                }
                return Err(e);
            }
        };

        if let Some(old_key) = old_key
            && let DeleteOutcome::CompletedWithWarning(reason) = self.storage.delete(&old_key).await
        {
            warn!(review_id = %id, key = %old_key, %reason, "Old review image left behind");
        }

        info!(review_id = %id, "Review updated");
        Ok(saved)
    }

    /// Delete a review and then its image.
    ///
    /// Returns the outcome of the image removal, or `None` if there was no image.
    ///
    /// # Errors
    ///
    /// Returns an error if review not found or repository operation fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<DeleteOutcome>, ReviewError> {
        let review = self.get(id).await?;

        if !self.repo.delete(id).await? {
            return Err(ReviewError::not_found(id));
        }

        let outcome = match &review.image_key {
            Some(key) => Some(self.storage.delete(key).await),
            None => None,
        };

        info!(review_id = %id, "Review deleted");
        Ok(outcome)
    }

    /// Retrieval URL of the review's image.
    #[must_use]
    pub fn image_url(&self, review: &Review) -> Option<String> {
        review.image_key.as_ref().map(|key| self.storage.url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::InMemoryReviewRepository;
    use crate::storage::{StorageConfig, StorageError, StorageProvider};
    use tempfile::TempDir;

    /// Repository whose writes always fail.
    struct FailingRepository;

    impl ReviewRepository for FailingRepository {
        async fn insert(&self, _review: Review) -> Result<Review, ReviewError> {
            Err(ReviewError::repository("insert failed"))
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Review>, ReviewError> {
            Ok(None)
        }

        async fn list(&self) -> Result<Vec<Review>, ReviewError> {
            Ok(Vec::new())
        }

        async fn update(&self, _review: Review) -> Result<Review, ReviewError> {
            Err(ReviewError::repository("update failed"))
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, ReviewError> {
            Ok(false)
        }
    }

    fn storage(tmp: &TempDir) -> Arc<ImageStorage> {
        let config = StorageConfig::new(StorageProvider::local(tmp.path()));
        Arc::new(ImageStorage::from_config(config).expect("storage"))
    }

    fn service(tmp: &TempDir) -> ReviewService<InMemoryReviewRepository> {
        ReviewService::new(storage(tmp), Arc::new(InMemoryReviewRepository::new()))
    }

    fn input(title: &str) -> ReviewInput {
        ReviewInput {
            title: title.to_string(),
            content: "great coffee".to_string(),
        }
    }

    fn jpeg(len: usize) -> UploadCandidate {
        UploadCandidate::new(vec![9u8; len])
            .with_filename("latte.jpg")
            .with_content_type("image/jpeg")
    }

    fn stored_files(tmp: &TempDir) -> usize {
        std::fs::read_dir(tmp.path()).expect("read_dir").count()
    }

    #[tokio::test]
    async fn test_create_with_image() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);

        let review = service
            .create(input("Cafe"), Some(jpeg(512)))
            .await
            .expect("create");

        let key = review.image_key.clone().expect("image key");
        assert!(tmp.path().join(key.as_str()).exists());
        assert_eq!(service.image_url(&review), Some(format!("/images/{key}")));
    }

    #[tokio::test]
    async fn test_create_with_blank_file_part_has_no_image() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);

        let review = service
            .create(input("Cafe"), Some(jpeg(0)))
            .await
            .expect("create");

        assert!(review.image_key.is_none());
        assert_eq!(service.image_url(&review), None);
        assert_eq!(stored_files(&tmp), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unsupported_image() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);
        let text = UploadCandidate::new(b"not an image".to_vec())
            .with_filename("x.txt")
            .with_content_type("text/plain");

        let err = service.create(input("Cafe"), Some(text)).await.unwrap_err();

        assert!(matches!(
            err,
            ReviewError::Storage(StorageError::UnsupportedType { .. })
        ));
        assert!(service.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_removes_stored_image() {
        let tmp = TempDir::new().expect("tempdir");
        let service = ReviewService::new(storage(&tmp), Arc::new(FailingRepository));

        let err = service
            .create(input("Cafe"), Some(jpeg(64)))
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::Repository(_)));
        assert_eq!(stored_files(&tmp), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_image_then_deletes_old() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);
        let created = service
            .create(input("Cafe"), Some(jpeg(64)))
            .await
            .expect("create");
        let old_key = created.image_key.clone().expect("old key");

        let updated = service
            .update(created.id, input("Cafe (revisited)"), Some(jpeg(128)))
            .await
            .expect("update");

        let new_key = updated.image_key.clone().expect("new key");
        assert_ne!(old_key, new_key);
        assert_eq!(updated.title, "Cafe (revisited)");
        assert!(!tmp.path().join(old_key.as_str()).exists());
        assert!(tmp.path().join(new_key.as_str()).exists());
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_old_key() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);
        let created = service
            .create(input("Cafe"), Some(jpeg(64)))
            .await
            .expect("create");

        let updated = service
            .update(created.id, input("Renamed"), None)
            .await
            .expect("update");

        assert_eq!(updated.image_key, created.image_key);
        assert_eq!(stored_files(&tmp), 1);
    }

    #[tokio::test]
    async fn test_update_with_rejected_image_keeps_old_image() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);
        let created = service
            .create(input("Cafe"), Some(jpeg(64)))
            .await
            .expect("create");
        let bad = UploadCandidate::new(b"<svg/>".to_vec())
            .with_filename("x.svg")
            .with_content_type("image/svg+xml");

        let err = service
            .update(created.id, input("Renamed"), Some(bad))
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::Storage(_)));
        let current = service.get(created.id).await.expect("get");
        assert_eq!(current.title, "Cafe");
        assert_eq!(current.image_key, created.image_key);
        let key = current.image_key.expect("key");
        assert!(tmp.path().join(key.as_str()).exists());
    }

    #[tokio::test]
    async fn test_delete_removes_image() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);
        let created = service
            .create(input("Cafe"), Some(jpeg(64)))
            .await
            .expect("create");

        let outcome = service.delete(created.id).await.expect("delete");

        assert_eq!(outcome, Some(DeleteOutcome::Completed));
        assert_eq!(stored_files(&tmp), 0);
        assert!(matches!(
            service.get(created.id).await,
            Err(ReviewError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_review() {
        let tmp = TempDir::new().expect("tempdir");
        let service = service(&tmp);

        let result = service.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReviewError::NotFound(_))));
    }
}
