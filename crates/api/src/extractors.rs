//! Request extractors.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use reviewbox_core::review::ReviewInput;
use reviewbox_core::storage::UploadCandidate;
use reviewbox_shared::AppError;

use crate::error::ApiError;

/// Multipart field carrying the review text title.
pub const TITLE_FIELD: &str = "title";
/// Multipart field carrying the review body.
pub const CONTENT_FIELD: &str = "content";
/// Multipart field carrying the optional image file.
pub const IMAGE_FIELD: &str = "imageFile";

/// A review submission: text fields plus an optional image.
///
/// Unknown fields are ignored. A file input left blank still arrives as a
/// part with no bytes; it is passed through and treated as "no image" by the
/// review service.
#[derive(Debug, Default)]
pub struct ReviewForm {
    /// Title and content.
    pub input: ReviewInput,
    /// Uploaded image, if the form carried an image part.
    pub image: Option<UploadCandidate>,
}

impl<S> FromRequest<S> for ReviewForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;

        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);

            match name.as_deref() {
                Some(TITLE_FIELD) => {
                    form.input.title = field.text().await.map_err(multipart_error)?;
                }
                Some(CONTENT_FIELD) => {
                    form.input.content = field.text().await.map_err(multipart_error)?;
                }
                Some(IMAGE_FIELD) => form.image = Some(read_image(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_image(field: Field<'_>) -> Result<UploadCandidate, ApiError> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(multipart_error)?;

    let mut candidate = UploadCandidate::new(data);
    if let Some(filename) = filename {
        candidate = candidate.with_filename(filename);
    }
    if let Some(content_type) = content_type {
        candidate = candidate.with_content_type(content_type);
    }
    Ok(candidate)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError(AppError::PayloadTooLarge(err.body_text()))
    } else {
        ApiError::validation(err.body_text())
    }
}
