use std::sync::Arc;

use crate::analysis::service::Analyzer;
use crate::extraction::pdf::PdfDecoder;
use crate::ui::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Browser workspaces, one per session id.
    pub sessions: SessionStore,
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn Analyzer>,
    /// Only obtainable once the PDF engine has decoded its probe document.
    pub pdf: PdfDecoder,
}
