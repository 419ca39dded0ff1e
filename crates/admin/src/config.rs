//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MIAN_DATABASE_URL` - `SQLite` database URL (fallback: `DATABASE_URL`,
//!   default: `sqlite://mian-bakery.db`)
//! - `CLAUDE_API_KEY` - Anthropic Claude API key; AI features use their
//!   fallback texts when it is not set
//! - `CLAUDE_MODEL` - Claude model ID (default: claude-sonnet-4-20250514)
//! - `MIAN_BAKERY_PHONE` - Shop phone written to the settings on first run
//! - `MIAN_ADMIN_EMAIL` - Admin email written to the settings on first run

use secrecy::SecretString;
use thiserror::Error;

use mian_bakery_core::{Phone, ShopSettings};

/// Default database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://mian-bakery.db";

const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `SQLite` database URL
    pub database_url: String,
    /// Claude AI configuration, when an API key is set
    pub claude: Option<ClaudeConfig>,
    /// First-run shop phone
    pub bakery_phone: Option<Phone>,
    /// First-run admin email
    pub admin_email: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            claude: None,
            bakery_phone: None,
            admin_email: None,
        }
    }
}

/// Claude AI API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl ClaudeConfig {
    /// Returns `None` if `CLAUDE_API_KEY` is not set (AI features disabled).
    fn from_env() -> Option<Self> {
        get_optional_env("CLAUDE_API_KEY").map(|key| Self {
            api_key: SecretString::from(key),
            model: get_env_or_default("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
        })
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `MIAN_BAKERY_PHONE` is not a
    /// phone number or `MIAN_ADMIN_EMAIL` is not an email address.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let bakery_phone = get_optional_env("MIAN_BAKERY_PHONE")
            .map(|s| {
                Phone::parse(&s).map_err(|e| {
                    ConfigError::InvalidEnvVar("MIAN_BAKERY_PHONE".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let admin_email = get_optional_env("MIAN_ADMIN_EMAIL")
            .map(|s| validate_email(&s))
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("MIAN_ADMIN_EMAIL".to_string(), e))?;

        Ok(Self {
            database_url: get_database_url("MIAN_DATABASE_URL"),
            claude: ClaudeConfig::from_env(),
            bakery_phone,
            admin_email,
        })
    }

    /// Settings saved when the shop has none yet.
    #[must_use]
    pub fn initial_settings(&self) -> ShopSettings {
        let mut settings = ShopSettings::default();
        if let Some(phone) = &self.bakery_phone {
            settings.bakery_phone = phone.as_str().to_string();
        }
        if let Some(email) = &self.admin_email {
            settings.admin_email.clone_from(email);
        }
        settings
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> String {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_email(value: &str) -> Result<String, String> {
    if value.contains('@') {
        Ok(value.to_string())
    } else {
        Err("must contain @".to_string())
    }
}
