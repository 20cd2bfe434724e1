//! Analysis pipeline: pluggable, trait-based analyzer.
//!
//! Default: `GeminiAnalyzer`. `AppState` holds an `Arc<dyn Analyzer>` so
//! handlers and tests never depend on the concrete backend.
//!
//! Order of checks: input texts -> credential -> one model call -> JSON ->
//! schema. The first two fail before any network I/O.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::schema::validate_result;
use crate::config::ApiKey;
use crate::errors::AppError;
use crate::llm_client::GeminiClient;

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError>;
}

pub struct GeminiAnalyzer {
    llm: GeminiClient,
    api_key: Option<ApiKey>,
}

impl GeminiAnalyzer {
    pub fn new(llm: GeminiClient, api_key: Option<ApiKey>) -> Self {
        Self { llm, api_key }
    }

    /// Refuses to proceed without a usable credential.
    pub fn credential(&self) -> Result<&ApiKey, AppError> {
        self.api_key.as_ref().ok_or_else(|| {
            AppError::Configuration("Please set your Gemini API key in the .env file".to_string())
        })
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        request.validate()?;
        let api_key = self.credential()?;

        let prompt = build_analysis_prompt(&request.resume_text, &request.job_description);
        info!(
            "Requesting analysis: resume={} chars, job_description={} chars, prompt={} chars",
            request.resume_text.chars().count(),
            request.job_description.chars().count(),
            prompt.len()
        );

        let raw: Value = self
            .llm
            .call_json(api_key, &prompt)
            .await
            .map_err(|e| AppError::Analysis(e.to_string()))?;

        let result = validate_result(&raw)?;
        info!("Analysis complete: match_score={}", result.match_score);
        Ok(result)
    }
}
