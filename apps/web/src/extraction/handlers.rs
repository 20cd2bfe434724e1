//! Axum route handlers for the extraction API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::extraction::acquisition::{acquire_resume_text, AcquiredText};
use crate::state::AppState;

/// POST /api/v1/extract
///
/// Accepts a multipart upload with a single `file` field (.txt or .pdf) and
/// returns the recovered resume text.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AcquiredText>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e.body_text())))?;

        let acquired = acquire_resume_text(
            &state.pdf,
            file_name.as_deref(),
            content_type.as_deref(),
            bytes,
        )
        .await?;
        return Ok(Json(acquired));
    }

    Err(AppError::Validation(
        "Missing `file` field in upload".to_string(),
    ))
}
