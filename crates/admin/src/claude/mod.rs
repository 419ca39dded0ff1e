//! Claude API integration for the shop's AI features.
//!
//! [`Assistant`] is what the services hold: it forwards to a [`ClaudeClient`]
//! when an API key is configured and fails every request otherwise, so every
//! call site ends up with its fallback text.

mod client;
mod error;
mod types;

pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use types::{ChatRequest, ChatResponse, ContentBlock, Message, StopReason, Usage};

use mian_bakery_core::ai::{CompletionRequest, TextGenerator};

use crate::config::ClaudeConfig;

/// The configured text generator.
#[derive(Debug, Clone, Default)]
pub enum Assistant {
    Claude(ClaudeClient),
    #[default]
    Disabled,
}

impl Assistant {
    /// Build from optional configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError` if the client cannot be created from `config`.
    pub fn from_config(config: Option<&ClaudeConfig>) -> Result<Self, ClaudeError> {
        config.map_or(Ok(Self::Disabled), |config| {
            ClaudeClient::new(config).map(Self::Claude)
        })
    }

    /// Whether requests reach Claude.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Claude(_))
    }
}

impl TextGenerator for Assistant {
    type Error = ClaudeError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        match self {
            Self::Claude(client) => client.complete(request).await,
            Self::Disabled => Err(ClaudeError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use mian_bakery_core::ai::complete_or_fallback;

    use super::*;

    #[tokio::test]
    async fn test_disabled_assistant_uses_fallback() {
        let assistant = Assistant::from_config(None).expect("assistant");
        assert!(!assistant.is_enabled());

        let text = complete_or_fallback(
            &assistant,
            &CompletionRequest::text("Viết lời mời"),
            "Bếp Mian chào chị!",
        )
        .await;
        assert_eq!(text, "Bếp Mian chào chị!");
    }
}
