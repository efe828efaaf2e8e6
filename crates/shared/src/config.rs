//! Application configuration management.

use std::path::Path;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Uploaded file configuration.
    #[serde(default)]
    pub file: FileConfig,
    /// AWS configuration (object storage backend).
    #[serde(default)]
    pub aws: AwsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body size for multipart uploads.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Uploaded file configuration (`file.*`).
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    /// Backend selection.
    #[serde(default)]
    pub storage: FileStorageConfig,
    /// Root directory for the local backend (`file.upload_dir`).
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// URL prefix under which locally stored files are served (`file.url_prefix`).
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            storage: FileStorageConfig::default(),
            upload_dir: default_upload_dir(),
            url_prefix: default_url_prefix(),
        }
    }
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_url_prefix() -> String {
    "/images/".to_string()
}

/// Backend discriminator (`file.storage.type`).
#[derive(Debug, Clone, Deserialize)]
pub struct FileStorageConfig {
    /// `local` or `s3`. Parsed once at startup by the storage layer.
    #[serde(rename = "type", default = "default_storage_type")]
    pub kind: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            kind: default_storage_type(),
        }
    }
}

fn default_storage_type() -> String {
    "local".to_string()
}

/// AWS configuration (`aws.*`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsConfig {
    /// S3 settings.
    #[serde(default)]
    pub s3: S3Config,
}

/// S3-compatible object storage settings (`aws.s3.*`).
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    /// Bucket name. Required when `file.storage.type = s3`.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Bucket region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint (MinIO, R2, LocalStack).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID. Falls back to the AWS environment when unset.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key. Falls back to the AWS environment when unset.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Public base URL objects are reachable under (CDN or bucket website).
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Namespace prefix prepended to every generated key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: None,
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            public_base_url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_key_prefix() -> String {
    "reviews/".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files in `./config`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Loads `{dir}/default`, then `{dir}/{RUN_MODE}`, then `REVIEWBOX__*`
    /// environment variables, later sources overriding earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let default = dir.join("default");
        let mode = dir.join(run_mode);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&mode.to_string_lossy()).required(false))
            .add_source(config::Environment::with_prefix("REVIEWBOX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
