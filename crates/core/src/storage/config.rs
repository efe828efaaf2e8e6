//! Storage configuration types.

use std::path::PathBuf;
use std::str::FromStr;

use reviewbox_shared::AppConfig;

use super::error::StorageError;
use super::validation::UploadPolicy;

/// Backend discriminator (`file.storage.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Local filesystem.
    #[default]
    Local,
    /// S3-compatible object storage.
    S3,
}

impl BackendKind {
    /// Configuration value for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(StorageError::configuration(format!(
                "unknown file.storage.type '{other}' (expected 'local' or 's3')"
            ))),
        }
    }
}

/// Storage provider configuration.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// Local filesystem.
    Local {
        /// Root directory; created at startup.
        root: PathBuf,
        /// URL prefix files are served under.
        url_prefix: String,
    },
    /// S3-compatible storage: AWS S3, MinIO, Cloudflare R2
    S3 {
        /// Bucket name.
        bucket: String,
        /// Region.
        region: String,
        /// Custom endpoint URL.
        endpoint: Option<String>,
        /// Access key ID.
        access_key_id: Option<String>,
        /// Secret access key.
        secret_access_key: Option<String>,
        /// Base URL objects are publicly reachable under.
        public_base_url: Option<String>,
        /// Prefix prepended to generated keys.
        key_prefix: String,
    },
}

impl StorageProvider {
    /// Default URL prefix for locally stored files.
    pub const DEFAULT_URL_PREFIX: &'static str = "/images/";
    /// Default key namespace in object storage.
    pub const DEFAULT_KEY_PREFIX: &'static str = "reviews/";

    /// Create local filesystem provider.
    #[must_use]
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::Local {
            root: root.into(),
            url_prefix: Self::DEFAULT_URL_PREFIX.to_string(),
        }
    }

    /// Create S3-compatible provider with credentials from the environment.
    #[must_use]
    pub fn s3(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            public_base_url: None,
            key_prefix: Self::DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Backend kind.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Local { .. } => BackendKind::Local,
            Self::S3 { .. } => BackendKind::S3,
        }
    }

    /// Get the provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Upload acceptance rules.
    pub policy: UploadPolicy,
}

impl StorageConfig {
    /// Create a new storage config with the default upload policy.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            policy: UploadPolicy::default(),
        }
    }

    /// Set the upload policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Select the backend from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] for an unknown discriminator or
    /// when `s3` is selected without a bucket.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, StorageError> {
        let provider = match config.file.storage.kind.parse::<BackendKind>()? {
            BackendKind::Local => StorageProvider::Local {
                root: PathBuf::from(&config.file.upload_dir),
                url_prefix: config.file.url_prefix.clone(),
            },
            BackendKind::S3 => {
                let s3 = &config.aws.s3;
                let bucket = s3
                    .bucket
                    .clone()
                    .filter(|b| !b.trim().is_empty())
                    .ok_or_else(|| {
                        StorageError::configuration("aws.s3.bucket is required for s3 storage")
                    })?;

                StorageProvider::S3 {
                    bucket,
                    region: s3.region.clone(),
                    endpoint: s3.endpoint.clone(),
                    access_key_id: s3.access_key_id.clone(),
                    secret_access_key: s3.secret_access_key.clone(),
                    public_base_url: s3.public_base_url.clone(),
                    key_prefix: s3.key_prefix.clone(),
                }
            }
        };

        Ok(Self::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("local", BackendKind::Local)]
    #[case("", BackendKind::Local)]
    #[case("s3", BackendKind::S3)]
    fn test_backend_kind_parse(#[case] raw: &str, #[case] expected: BackendKind) {
        assert_eq!(raw.parse::<BackendKind>().expect("valid kind"), expected);
    }

    #[test]
    fn test_backend_kind_unknown() {
        let err = "ftp".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_default_app_config_selects_local() {
        let config = StorageConfig::from_app_config(&AppConfig::default()).expect("config");
        assert_eq!(config.provider.kind(), BackendKind::Local);
        match config.provider {
            StorageProvider::Local { root, url_prefix } => {
                assert_eq!(root, PathBuf::from("uploads"));
                assert_eq!(url_prefix, "/images/");
            }
            StorageProvider::S3 { .. } => panic!("expected local provider"),
        }
    }

    #[test]
    fn test_s3_requires_bucket() {
        let mut app = AppConfig::default();
        app.file.storage.kind = "s3".to_string();

        let err = StorageConfig::from_app_config(&app).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_s3_from_app_config() {
        let mut app = AppConfig::default();
        app.file.storage.kind = "s3".to_string();
        app.aws.s3.bucket = Some("review-images".to_string());

        let config = StorageConfig::from_app_config(&app).expect("config");
        assert_eq!(config.provider.name(), "s3");
        match config.provider {
            StorageProvider::S3 {
                bucket, key_prefix, ..
            } => {
                assert_eq!(bucket, "review-images");
                assert_eq!(key_prefix, "reviews/");
            }
            StorageProvider::Local { .. } => panic!("expected s3 provider"),
        }
    }
}
