//! Failures talking to Claude.
//!
//! None of these reach the shop owner: every AI feature has a fixed fallback
//! text, so the services only log them.

use serde::Deserialize;
use thiserror::Error;

/// Errors from the Claude client.
#[derive(Debug, Error)]
pub enum ClaudeError {
    /// The request never got an answer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Claude rejected the request.
    #[error("API error ({kind}): {message}")]
    Api {
        /// `type` of the error object, e.g. `invalid_request_error`.
        kind: String,
        message: String,
    },

    /// Too many requests; `Retry-After` in seconds.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Claude is temporarily overloaded (HTTP 529).
    #[error("Claude is overloaded")]
    Overloaded,

    /// The key was refused.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The configured key cannot be sent as a header value.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    /// The response body is not a Messages API response.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A JSON answer was requested but the text is not JSON.
    #[error("answer is not JSON: {0}")]
    NotJson(String),

    /// No API key is configured.
    #[error("Claude is not configured")]
    NotConfigured,
}

impl ClaudeError {
    /// Whether the same request may succeed later.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::RateLimited(_) | Self::Overloaded)
    }
}

/// Body of an error response: `{"type":"error","error":{...}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl From<ErrorEnvelope> for ClaudeError {
    fn from(envelope: ErrorEnvelope) -> Self {
        match envelope.error.kind.as_str() {
            "overloaded_error" => Self::Overloaded,
            "authentication_error" => Self::Unauthorized(envelope.error.message),
            _ => Self::Api {
                kind: envelope.error.kind,
                message: envelope.error.message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> ClaudeError {
        serde_json::from_str::<ErrorEnvelope>(body)
            .expect("deserialize")
            .into()
    }

    #[test]
    fn test_overloaded_body() {
        let err = envelope(
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        );
        assert!(matches!(err, ClaudeError::Overloaded));
        assert!(err.is_transient());
    }

    #[test]
    fn test_invalid_request_body() {
        let err = envelope(concat!(
            r#"{"type":"error","error":{"type":"invalid_request_error","#,
            r#""message":"max_tokens: too large"}}"#
        ));
        assert_eq!(err.to_string(), "API error (invalid_request_error): max_tokens: too large");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_not_configured_is_permanent() {
        assert!(!ClaudeError::NotConfigured.is_transient());
        assert_eq!(
            ClaudeError::RateLimited(30).to_string(),
            "rate limited, retry after 30 seconds"
        );
    }
}
