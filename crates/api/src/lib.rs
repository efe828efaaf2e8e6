//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - REST API routes for reviews
//! - Multipart form extraction for review submissions
//! - Error responses
//! - Static serving of locally stored images

pub mod error;
pub mod extractors;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, header};
use reviewbox_core::review::{InMemoryReviewRepository, ReviewService};
use reviewbox_core::storage::ImageStorage;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::{SetResponseHeader, SetResponseHeaderLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

/// Cache policy for served images. Keys are never reused.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=3600";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Image storage facade.
    pub storage: Arc<ImageStorage>,
    /// Review service backed by the in-memory repository.
    pub reviews: Arc<ReviewService<InMemoryReviewRepository>>,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build state around a storage facade with a fresh review repository.
    #[must_use]
    pub fn new(storage: ImageStorage, max_upload_bytes: usize) -> Self {
        let storage = Arc::new(storage);
        let reviews = Arc::new(ReviewService::new(
            Arc::clone(&storage),
            Arc::new(InMemoryReviewRepository::new()),
        ));

        Self {
            storage,
            reviews,
            max_upload_bytes,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    if let Some((root, url_prefix)) = state.storage.local_mount()
        && let Some(mount) = mount_path(url_prefix)
    {
        info!(mount, root = %root.display(), "Serving local images");
        router = router.nest_service(mount, image_files(root));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Route path for a local URL prefix. Absolute URLs (a CDN in front of the
/// upload directory) and the bare root are not mounted.
fn mount_path(url_prefix: &str) -> Option<&str> {
    let mount = url_prefix.trim_end_matches('/');
    (url_prefix.starts_with('/') && !mount.is_empty()).then_some(mount)
}

fn image_files(root: &Path) -> SetResponseHeader<ServeDir, HeaderValue> {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(IMAGE_CACHE_CONTROL),
        ))
        .service(ServeDir::new(root))
}
