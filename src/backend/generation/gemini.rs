/**
 * Gemini Text Generation Transport
 *
 * Calls the Generative Language REST API (`models/{model}:generateContent`)
 * with a single user turn and concatenates the text parts of the first
 * candidate. An answer without candidates is returned as empty text so the
 * retry pipeline classifies it as an empty result.
 */

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::backend::generation::provider::{ProviderError, TextGenerator};

/// Value shipped in `.env.example` files; never a real key
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raised at construction when the configured API key cannot be used
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid Gemini API key: {reason}")]
pub struct InvalidApiKeyError {
    reason: &'static str,
}

impl InvalidApiKeyError {
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// Reject empty and placeholder keys before any request is made
pub fn validate_api_key(api_key: &str) -> Result<(), InvalidApiKeyError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(InvalidApiKeyError {
            reason: "API key is empty",
        });
    }
    if key == PLACEHOLDER_API_KEY {
        return Err(InvalidApiKeyError {
            reason: "API key is the placeholder value",
        });
    }
    Ok(())
}

/// Connection settings for the Gemini API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// `TextGenerator` backed by the Gemini REST API
pub struct GeminiGenerator {
    api_key: String,
    http_client: HttpClient,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiGenerator {
    pub fn new(settings: GeminiSettings) -> Result<Self, InvalidApiKeyError> {
        validate_api_key(&settings.api_key)?;

        let http_client = HttpClient::builder()
            .timeout(settings.timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                HttpClient::new()
            });

        Ok(Self {
            api_key: settings.api_key.trim().to_string(),
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Pull a readable message out of an error response body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{} ({})", envelope.error.message, status),
            None => envelope.error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::transport(format!(
                "Prompt blocked by provider: {}",
                reason
            )));
        }
        return Ok(String::new());
    };

    Ok(candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default())
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(Some(status.as_u16()), error_message(&body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::transport(format!("Failed to parse response: {}", e)))?;

        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator_for(server: &MockServer) -> GeminiGenerator {
        let mut settings = GeminiSettings::new("test-key");
        settings.base_url = server.uri();
        GeminiGenerator::new(settings).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_placeholder_keys() {
        assert_matches!(GeminiGenerator::new(GeminiSettings::new("")), Err(_));
        assert_matches!(GeminiGenerator::new(GeminiSettings::new("   ")), Err(_));
        let err = GeminiGenerator::new(GeminiSettings::new(PLACEHOLDER_API_KEY)).unwrap_err();
        assert_eq!(err.reason(), "API key is the placeholder value");
        assert!(GeminiGenerator::new(GeminiSettings::new("real-key")).is_ok());
    }

    #[tokio::test]
    async fn test_complete_concatenates_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = generator_for(&server).complete("prompt").await.unwrap();
        assert_eq!(text, "Hello, world");
    }

    #[tokio::test]
    async fn test_rate_limit_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let err = generator_for(&server).complete("prompt").await.unwrap_err();
        assert_eq!(err.status, Some(429));
        assert_eq!(err.message, "Quota exceeded (RESOURCE_EXHAUSTED)");
    }

    #[tokio::test]
    async fn test_missing_candidates_is_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let text = generator_for(&server).complete("prompt").await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = generator_for(&server).complete("prompt").await.unwrap_err();
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("upstream exploded"), "upstream exploded");
    }
}
