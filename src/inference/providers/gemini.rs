//! Gemini provider using the `generateContent` endpoint.
//!
//! Each call sends exactly one user turn. The visible transcript may hold a
//! long history, but the service only ever sees the current prompt.
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent?key=...
//! {"contents":[{"role":"user","parts":[{"text":"..."}]}]}
//!
//! 200 → {"candidates":[{"content":{"parts":[{"text":"..."}]}}]}
//! 4xx → {"error":{"message":"..."}}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::DEFAULT_GEMINI_BASE_URL;
use crate::inference::text::strip_bold_markers;
use crate::inference::{CompletionProvider, ProviderError};

// ============================================================================
// Gemini API Types
// ============================================================================

/// The request body for `generateContent`
#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Deserialize, Debug)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    message: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn build_request(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: prompt }],
        }],
    }
}

/// Pulls the first candidate's first text part out of a success body.
fn extract_reply(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| ProviderError::Parse("response has no candidate text".to_string()))
}

/// Builds the error for a non-2xx response, preferring the service's own message.
fn api_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with HTTP {status}"));
    ProviderError::Api { status, message }
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Arguments
    /// * `api_key` - Google AI API key
    /// * `base_url` - Optional custom base URL (defaults to the public v1 endpoint)
    /// * `model` - Model name, e.g. `gemini-pro`
    /// * `timeout` - Upper bound for one request, body included
    pub fn new(api_key: String, base_url: Option<String>, model: String, timeout: Duration) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn send_request(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = build_request(prompt);
        let url = self.endpoint();
        info!(
            "Gemini request: model={}, prompt_len={}",
            self.model,
            prompt.len()
        );
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Gemini response status: {}", status);

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        debug!("Raw Gemini response: {}", text);

        if !status.is_success() {
            warn!("Gemini API error: {} - {}", status.as_u16(), text);
            return Err(api_error(status.as_u16(), &text));
        }

        let reply = extract_reply(&text)?;
        info!("Gemini reply: {} bytes", reply.len());
        Ok(strip_bold_markers(&reply))
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, self.send_request(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Gemini request timed out after {:?}", self.timeout);
                Err(ProviderError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_single_user_turn() {
        let json = serde_json::to_string(&build_request("Hello")).unwrap();
        assert_eq!(
            json,
            r#"{"contents":[{"role":"user","parts":[{"text":"Hello"}]}]}"#
        );
    }

    #[test]
    fn test_extract_reply_takes_first_candidate_first_part() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"first"},{"text":"second"}]}},
            {"content":{"parts":[{"text":"other"}]}}
        ]}"#;
        assert_eq!(extract_reply(body).unwrap(), "first");
    }

    #[test]
    fn test_extract_reply_without_candidates_is_parse_error() {
        assert!(matches!(
            extract_reply(r#"{"candidates":[]}"#),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(extract_reply(r#"{}"#), Err(ProviderError::Parse(_))));
        assert!(matches!(
            extract_reply(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_extract_reply_rejects_non_json() {
        assert!(matches!(
            extract_reply("<html>oops</html>"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_api_error_prefers_service_message() {
        let err = api_error(429, r#"{"error":{"code":429,"message":"quota exceeded"}}"#);
        assert_eq!(
            err,
            ProviderError::Api {
                status: 429,
                message: "quota exceeded".to_string()
            }
        );
    }

    #[test]
    fn test_api_error_falls_back_to_generic_message() {
        let err = api_error(502, "Bad Gateway");
        assert_eq!(err.display_text(), "Request failed with HTTP 502");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(
            "k".to_string(),
            Some("http://localhost:9999/v1/".to_string()),
            "gemini-pro".to_string(),
            Duration::from_secs(1),
        );
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1/models/gemini-pro:generateContent"
        );
    }
}
