/// LLM Client: the single point of entry for all Gemini API calls.
///
/// No other module may call the Gemini API directly.
///
/// Model: gemini-2.0-flash (hardcoded to prevent drift). One attempt per call:
/// no retries, no backoff. The only timeout is the HTTP client's own.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ApiKey;

pub mod prompts;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for every analysis call.
pub const MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response envelope is missing `{0}`")]
    MissingEnvelopeField(&'static str),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// `generateContent` response. Every level is optional so a short envelope is
/// reported as a missing field rather than a generic parse error.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Text of `candidates[0].content.parts[0]`.
    pub fn text(&self) -> Result<&str, LlmError> {
        let candidate = self
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or(LlmError::MissingEnvelopeField("candidates"))?;
        let content = candidate
            .content
            .as_ref()
            .ok_or(LlmError::MissingEnvelopeField("candidates[0].content"))?;
        let part = content
            .parts
            .as_ref()
            .and_then(|p| p.first())
            .ok_or(LlmError::MissingEnvelopeField("candidates[0].content.parts"))?;
        part.text
            .as_deref()
            .ok_or(LlmError::MissingEnvelopeField("candidates[0].content.parts[0].text"))
    }
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// Thin wrapper over the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> Result<Self, LlmError> {
        Self::with_base_url(GEMINI_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url)
    }

    /// Sends one prompt and returns the full response envelope.
    /// The credential travels as the `key` query parameter.
    pub async fn call(&self, api_key: &ApiKey, prompt: &str) -> Result<GenerateResponse, LlmError> {
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.expose())])
            .json(&request_body)
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await.map_err(redact)?;

        if let Some(usage) = &generated.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(generated)
    }

    /// Calls the model and deserializes its text answer as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        api_key: &ApiKey,
        prompt: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(api_key, prompt).await?;
        let text = strip_json_fences(response.text()?);
        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// The request URL carries the credential; keep it out of error messages.
fn redact(e: reqwest::Error) -> LlmError {
    LlmError::Http(e.without_url())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_envelope_text_extracted() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{}"}],"role":"model"}}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().unwrap(), "{}");
    }

    #[test]
    fn test_envelope_without_candidates() {
        let response: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(matches!(
            response.text(),
            Err(LlmError::MissingEnvelopeField("candidates"))
        ));
    }

    #[test]
    fn test_envelope_with_empty_candidates() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            response.text(),
            Err(LlmError::MissingEnvelopeField("candidates"))
        ));
    }

    #[test]
    fn test_envelope_without_content() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(matches!(
            response.text(),
            Err(LlmError::MissingEnvelopeField("candidates[0].content"))
        ));
    }

    #[test]
    fn test_endpoint_uses_fixed_model() {
        let client = GeminiClient::with_base_url("http://localhost:9999/").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
