//! Object storage backend using Apache OpenDAL.

use opendal::{Operator, services};
use tracing::{debug, error, info, warn};

use super::error::StorageError;
use super::key::{ensure_no_traversal, generate_key, with_trailing_slash};
use super::types::{DeleteOutcome, StorageKey, UploadCandidate};
use super::validation::UploadPolicy;

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Settings {
    /// Bucket name.
    pub bucket: String,
    /// Region.
    pub region: String,
    /// Custom endpoint URL.
    pub endpoint: Option<String>,
    /// Access key ID.
    pub access_key_id: Option<String>,
    /// Secret access key.
    pub secret_access_key: Option<String>,
}

impl S3Settings {
    /// Base URL for objects in this bucket when none is configured.
    ///
    /// Path-style for custom endpoints, virtual-hosted AWS style otherwise.
    #[must_use]
    pub fn default_public_base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

/// Object storage backend.
#[derive(Debug, Clone)]
pub struct ObjectStorageBackend {
    operator: Operator,
    bucket: String,
    key_prefix: String,
    public_base_url: String,
    policy: UploadPolicy,
}

impl ObjectStorageBackend {
    /// Connect to an S3-compatible bucket.
    ///
    /// Credentials left unset are loaded from the standard AWS environment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the operator cannot be built.
    pub fn s3(
        settings: &S3Settings,
        key_prefix: impl Into<String>,
        public_base_url: Option<String>,
        policy: UploadPolicy,
    ) -> Result<Self, StorageError> {
        let mut builder = services::S3::default()
            .bucket(&settings.bucket)
            .region(&settings.region);

        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let Some(access_key_id) = &settings.access_key_id {
            builder = builder.access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &settings.secret_access_key {
            builder = builder.secret_access_key(secret_access_key);
        }

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        let public_base_url =
            public_base_url.unwrap_or_else(|| settings.default_public_base_url());

        Ok(Self::with_operator(
            operator,
            settings.bucket.clone(),
            key_prefix,
            public_base_url,
            policy,
        ))
    }

    /// Wrap an existing operator. A non-empty `key_prefix` is normalised to
    /// end in `/`.
    #[must_use]
    pub fn with_operator(
        operator: Operator,
        bucket: impl Into<String>,
        key_prefix: impl Into<String>,
        public_base_url: impl Into<String>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            operator,
            bucket: bucket.into(),
            key_prefix: with_trailing_slash(key_prefix),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    /// Bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Validate, name and upload a candidate with its declared content type.
    ///
    /// Not retried on failure.
    ///
    /// # Errors
    ///
    /// Returns a rejection for invalid candidates and
    /// [`StorageError::Unavailable`] when the upload fails.
    pub async fn store(&self, candidate: UploadCandidate) -> Result<StorageKey, StorageError> {
        self.policy.validate(&candidate)?;

        let key = generate_key(&self.key_prefix, candidate.filename())?;
        let size = candidate.len();
        let content_type = candidate.content_type().unwrap_or_default().to_string();

        self.operator
            .write_with(key.as_str(), candidate.into_data())
            .content_type(&content_type)
            .await
            .map_err(|e| {
                error!(bucket = %self.bucket, key = %key, error = %e, "Object upload failed");
                StorageError::from(e)
            })?;

        info!(bucket = %self.bucket, key = %key, size, "Stored upload in object storage");
        Ok(key)
    }

    /// Remove the object for `key`. Never fails; problems come back as a warning.
    pub async fn delete(&self, key: &StorageKey) -> DeleteOutcome {
        if key.is_blank() {
            return DeleteOutcome::Completed;
        }

        if let Err(e) = ensure_no_traversal(key.as_str()) {
            warn!(key = %key, error = %e, "Refusing to delete unsafe key");
            return DeleteOutcome::CompletedWithWarning(e.to_string());
        }

        match self.operator.delete(key.as_str()).await {
            Ok(()) => {
                debug!(bucket = %self.bucket, key = %key, "Deleted object");
                DeleteOutcome::Completed
            }
            Err(e) => {
                warn!(bucket = %self.bucket, key = %key, error = %e, "Object delete failed");
                DeleteOutcome::CompletedWithWarning(e.to_string())
            }
        }
    }

    /// Public URL of the object. No existence check.
    #[must_use]
    pub fn url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_backend() -> ObjectStorageBackend {
        let operator = Operator::new(services::Memory::default())
            .expect("memory operator")
            .finish();
        ObjectStorageBackend::with_operator(
            operator,
            "review-images",
            "reviews/",
            "https://cdn.example.com/",
            UploadPolicy::default(),
        )
    }

    /// S3 backend pointed at a port nothing listens on.
    fn unreachable_backend() -> ObjectStorageBackend {
        let settings = S3Settings {
            bucket: "review-images".to_string(),
            region: "us-east-1".to_string(),
            endpoint: Some("http://127.0.0.1:1".to_string()),
            access_key_id: Some("test-access-key".to_string()),
            secret_access_key: Some("test-secret-key".to_string()),
        };
        ObjectStorageBackend::s3(&settings, "reviews/", None, UploadPolicy::default())
            .expect("backend")
    }

    fn webp(len: usize) -> UploadCandidate {
        UploadCandidate::new(vec![3u8; len])
            .with_filename("sunset.webp")
            .with_content_type("image/webp")
    }

    #[tokio::test]
    async fn test_store_uploads_under_namespace() {
        let backend = memory_backend();

        let key = backend.store(webp(2048)).await.expect("store");

        assert!(key.as_str().starts_with("reviews/"));
        assert!(key.as_str().ends_with(".webp"));
        let stored = backend.operator.read(key.as_str()).await.expect("read");
        assert_eq!(stored.to_vec(), vec![3u8; 2048]);
    }

    #[tokio::test]
    async fn test_store_rejects_empty_and_unsupported() {
        let backend = memory_backend();

        let err = backend.store(webp(0)).await.unwrap_err();
        assert!(matches!(err, StorageError::EmptyUpload));

        let text = UploadCandidate::new(b"hi".to_vec())
            .with_filename("a.txt")
            .with_content_type("text/plain");
        let err = backend.store(text).await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedType { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = memory_backend();
        let key = backend.store(webp(16)).await.expect("store");

        assert_eq!(backend.delete(&key).await, DeleteOutcome::Completed);
        assert_eq!(backend.delete(&key).await, DeleteOutcome::Completed);
        assert_eq!(
            backend.delete(&StorageKey::new("reviews/missing.png")).await,
            DeleteOutcome::Completed
        );
        assert!(!backend.operator.exists(key.as_str()).await.expect("exists"));
    }

    #[tokio::test]
    async fn test_delete_traversal_key_is_warning() {
        let backend = memory_backend();
        let outcome = backend.delete(&StorageKey::new("reviews/../other")).await;
        assert!(outcome.has_warning());
    }

    #[tokio::test]
    async fn test_key_prefix_without_trailing_slash_is_normalised() {
        let operator = Operator::new(services::Memory::default())
            .expect("memory operator")
            .finish();
        let backend = ObjectStorageBackend::with_operator(
            operator,
            "review-images",
            "reviews",
            "https://cdn.example.com",
            UploadPolicy::default(),
        );

        let key = backend.store(webp(16)).await.expect("store");

        assert!(key.as_str().starts_with("reviews/"));
        assert!(!key.as_str().contains("//"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let backend = unreachable_backend();

        let err = backend.store(webp(16)).await.unwrap_err();

        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_delete_against_unreachable_service_is_warning() {
        let backend = unreachable_backend();

        let outcome = backend.delete(&StorageKey::new("reviews/abc.png")).await;

        assert!(outcome.has_warning());
    }

    #[test]
    fn test_url_uses_public_base() {
        let backend = memory_backend();
        let key = StorageKey::new("reviews/abc.png");
        assert_eq!(backend.url(&key), "https://cdn.example.com/reviews/abc.png");
    }

    #[test]
    fn test_default_public_base_url() {
        let aws = S3Settings {
            bucket: "review-images".to_string(),
            region: "ap-northeast-2".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        };
        assert_eq!(
            aws.default_public_base_url(),
            "https://review-images.s3.ap-northeast-2.amazonaws.com"
        );

        let minio = S3Settings {
            endpoint: Some("http://localhost:9000/".to_string()),
            ..aws
        };
        assert_eq!(
            minio.default_public_base_url(),
            "http://localhost:9000/review-images"
        );
    }
}
