//! Contract for the hosted text-generation service.
//!
//! The shop uses generated text for chat greetings, SMS invitations and
//! customer matching. Generation is never required for correctness: every call
//! site supplies a deterministic fallback, and [`complete_or_fallback`] logs
//! the failure and returns it.

use std::future::Future;

use serde_json::Value;
use tracing::warn;

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Ask for a JSON document instead of free text.
    pub expect_json: bool,
    /// JSON schema the response should follow when `expect_json` is set.
    pub schema: Option<Value>,
}

impl CompletionRequest {
    /// Free-text completion.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            expect_json: false,
            schema: None,
        }
    }

    /// Structured completion following `schema`.
    #[must_use]
    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            expect_json: true,
            schema: Some(schema),
        }
    }
}

/// Something that turns a prompt into text.
pub trait TextGenerator: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Complete `request`.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Error returned by [`DisabledGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("text generation is not configured")]
pub struct GenerationDisabled;

/// Generator used when no API key is configured. Always fails, so callers get
/// their fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

impl TextGenerator for DisabledGenerator {
    type Error = GenerationDisabled;

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, Self::Error> {
        Err(GenerationDisabled)
    }
}

/// Complete `request`, or return `fallback` if generation fails or comes back
/// blank.
pub async fn complete_or_fallback<G: TextGenerator>(
    generator: &G,
    request: &CompletionRequest,
    fallback: impl Into<String>,
) -> String {
    match generator.complete(request).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("text generation returned an empty response, using fallback");
            fallback.into()
        }
        Err(e) => {
            warn!(error = %e, "text generation failed, using fallback");
            fallback.into()
        }
    }
}
