//! Axum route handlers for the analysis API.

use axum::{extract::State, Json};

use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Runs one analysis of `resume_text` against `job_description`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = state.analyzer.analyze(&request).await?;
    Ok(Json(result))
}
