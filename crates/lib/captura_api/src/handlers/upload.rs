//! Image upload handler.

use axum::Json;
use axum::extract::{Multipart, State};

use crate::AppState;
use crate::error::AppResult;
use crate::models::UploadResponse;
use crate::services::ingest;

/// `POST /records/upload` — OCR an uploaded image into a structured
/// document. The image is staged transiently and never persisted.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let resp = ingest::ingest_image(&state, multipart).await?;
    Ok(Json(resp))
}
