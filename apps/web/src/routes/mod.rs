pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::analysis::handlers as analysis;
use crate::extraction::acquisition::MAX_UPLOAD_BYTES;
use crate::extraction::handlers as extraction;
use crate::state::AppState;
use crate::ui::handlers as ui;

/// Headroom on top of the largest accepted file for the other form fields.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/extract", post(extraction::handle_extract))
        .route("/analyze", post(analysis::handle_analyze))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser UI
        .route("/", get(ui::handle_new_session))
        .route("/sessions/:id", get(ui::handle_show_session))
        .route("/sessions/:id/resume", post(ui::handle_upload_resume))
        .route("/sessions/:id/analyze", post(ui::handle_session_analyze))
        .route("/sessions/:id/view", post(ui::handle_switch_view))
        .route("/sessions/:id/reset", post(ui::handle_reset))
        // JSON API
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
        .with_state(state)
}
