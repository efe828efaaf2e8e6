//! Review routes.
//!
//! Creating and editing take a multipart form (see [`ReviewForm`]); every
//! response is JSON.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use reviewbox_core::review::Review;
use reviewbox_core::storage::{DeleteOutcome, StorageKey};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::ReviewForm};

/// Creates the review routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/reviews/{id}", get(get_review))
        .route("/reviews/{id}/edit", post(update_review))
        .route("/reviews/{id}/delete", post(delete_review))
}

// ============================================================================
// Response Types
// ============================================================================

/// A review as returned by the API.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// Review ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Storage key of the attached image.
    pub image_key: Option<String>,
    /// Retrieval URL of the attached image.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// What happened to a deleted review's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRemoval {
    /// The review had no image.
    None,
    /// The image is gone.
    Deleted,
    /// The image could not be removed and was left behind.
    LeftBehind,
}

/// Response for a deleted review.
#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    /// Deleted review ID.
    pub id: Uuid,
    /// Image removal result.
    pub image: ImageRemoval,
    /// Reason the image was left behind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl DeleteReviewResponse {
    fn new(id: Uuid, outcome: Option<DeleteOutcome>) -> Self {
        let (image, warning) = match outcome {
            None => (ImageRemoval::None, None),
            Some(DeleteOutcome::Completed) => (ImageRemoval::Deleted, None),
            Some(DeleteOutcome::CompletedWithWarning(reason)) => {
                (ImageRemoval::LeftBehind, Some(reason))
            }
        };
        Self { id, image, warning }
    }
}

fn to_response(state: &AppState, review: Review) -> ReviewResponse {
    let image_url = state.reviews.image_url(&review);

    ReviewResponse {
        id: review.id,
        title: review.title,
        content: review.content,
        image_key: review.image_key.map(StorageKey::into_string),
        image_url,
        created_at: review.created_at,
        updated_at: review.updated_at,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/reviews`
/// List reviews, newest first.
async fn list_reviews(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.reviews.list().await?;

    let response: Vec<ReviewResponse> = reviews
        .into_iter()
        .map(|review| to_response(&state, review))
        .collect();

    Ok(Json(response))
}

/// POST `/reviews`
/// Create a review with an optional image.
async fn create_review(
    State(state): State<AppState>,
    form: ReviewForm,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.reviews.create(form.input, form.image).await?;

    info!(review_id = %review.id, "Review submitted");
    Ok((StatusCode::CREATED, Json(to_response(&state, review))))
}

/// GET `/reviews/{id}`
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.reviews.get(id).await?;
    Ok(Json(to_response(&state, review)))
}

/// POST `/reviews/{id}/edit`
/// Update text and optionally replace the image.
async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    form: ReviewForm,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.reviews.update(id, form.input, form.image).await?;
    Ok(Json(to_response(&state, review)))
}

/// POST `/reviews/{id}/delete`
/// Delete a review and its image. A leftover image is reported, not an error.
async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.reviews.delete(id).await?;
    let response = DeleteReviewResponse::new(id, outcome);

    if let Some(reason) = &response.warning {
        warn!(review_id = %id, %reason, "Review deleted, image left behind");
    }

    Ok(Json(response))
}
