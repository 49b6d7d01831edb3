//! Upload ingestion — multipart image to structured document.

use std::time::Duration;

use axum::extract::Multipart;

use captura_core::ocr;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::UploadResponse;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// Pull the single image part out of the multipart body and run it through
/// the OCR pipeline. The staged file is gone by the time this returns,
/// whatever the engine did.
pub async fn ingest_image(state: &AppState, mut multipart: Multipart) -> AppResult<UploadResponse> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read image field: {e}")))?;
            image = Some(bytes);
            break;
        }
    }

    let image = image.ok_or_else(|| AppError::Validation("No image supplied".into()))?;

    let document = ocr::process_image(
        state.ocr.as_ref(),
        &image,
        &state.config.ocr_lang,
        Duration::from_secs(state.config.ocr_timeout_secs),
    )
    .await?;

    Ok(UploadResponse { document })
}
