//! Claude API client.
//!
//! Non-streaming access to the Anthropic Messages API, exposed to the rest of
//! the shop through [`TextGenerator`].

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use mian_bakery_core::ai::{CompletionRequest, TextGenerator};

use crate::config::ClaudeConfig;

use super::error::{ClaudeError, ErrorEnvelope};
use super::types::{ChatRequest, ChatResponse, Message, StopReason};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Claude API client.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    model: String,
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl ClaudeClient {
    /// Create a new Claude client.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::InvalidApiKey` if the key contains characters
    /// that are not allowed in a header, or `ClaudeError::Http` if the HTTP
    /// client cannot be built.
    pub fn new(config: &ClaudeConfig) -> Result<Self, ClaudeError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| ClaudeError::InvalidApiKey(e.to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    /// The model requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a chat request and get the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, messages, system), fields(model = %self.inner.model))]
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> Result<ChatResponse, ClaudeError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system,
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let response = handle_response(response).await?;
        if response.stop_reason == Some(StopReason::MaxTokens) {
            warn!(id = %response.id, "claude response truncated at max_tokens");
        }
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "claude response"
        );
        Ok(response)
    }
}

impl TextGenerator for ClaudeClient {
    type Error = ClaudeError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let system = request.expect_json.then(|| json_instructions(request));
        let response = self
            .chat(vec![Message::user(request.prompt.clone())], system)
            .await
            .inspect_err(|e| {
                debug!(error = %e, transient = e.is_transient(), "claude request failed");
            })?;
        let text = response.text();

        if request.expect_json {
            extract_json(&text).map(str::to_string)
        } else {
            Ok(text)
        }
    }
}

/// System prompt asking for a bare JSON document.
fn json_instructions(request: &CompletionRequest) -> String {
    let mut system =
        "Respond with a single JSON document and nothing else: no prose, no code fences."
            .to_string();
    if let Some(schema) = &request.schema {
        system.push_str("\nThe document must match this JSON schema:\n");
        system.push_str(&schema.to_string());
    }
    system
}

/// The JSON document in `text`, with any Markdown code fence removed.
///
/// # Errors
///
/// Returns `ClaudeError::NotJson` if what remains is not valid JSON.
fn extract_json(text: &str) -> Result<&str, ClaudeError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim);

    serde_json::from_str::<serde_json::Value>(body)
        .map_err(|e| ClaudeError::NotJson(e.to_string()))?;
    Ok(body)
}

/// Decode a successful response, or turn the status and body into an error.
async fn handle_response(response: reqwest::Response) -> Result<ChatResponse, ClaudeError> {
    let status = response.status();
    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body)
            .map_err(|e| ClaudeError::UnexpectedResponse(e.to_string()));
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());
    let body = response.text().await?;
    Err(error_from_status(status, retry_after, &body))
}

fn error_from_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> ClaudeError {
    match status.as_u16() {
        429 => ClaudeError::RateLimited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        529 => ClaudeError::Overloaded,
        401 => ClaudeError::Unauthorized("API key was refused".to_string()),
        _ => serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
            |_| ClaudeError::Api {
                kind: format!("http_{}", status.as_u16()),
                message: body.to_string(),
            },
            ClaudeError::from,
        ),
    }
}
