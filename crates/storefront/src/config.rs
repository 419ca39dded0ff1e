//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MIAN_DATABASE_URL` - `SQLite` database URL (fallback: `DATABASE_URL`,
//!   default: `sqlite://mian-bakery.db`)
//! - `MIAN_INACTIVITY_DAYS` - Days without a completed order before the chat
//!   greeting promotes a batched product (default: 90)

use thiserror::Error;

/// Default database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://mian-bakery.db";

/// Default inactivity threshold in days.
pub const DEFAULT_INACTIVITY_DAYS: i64 = 90;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// `SQLite` database URL
    pub database_url: String,
    /// Days without a completed order after which a customer counts as inactive
    pub inactivity_days: i64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            inactivity_days: DEFAULT_INACTIVITY_DAYS,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `MIAN_INACTIVITY_DAYS` is not a
    /// non-negative integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("MIAN_DATABASE_URL");
        let inactivity_days = get_env_or_default(
            "MIAN_INACTIVITY_DAYS",
            &DEFAULT_INACTIVITY_DAYS.to_string(),
        );
        let inactivity_days = parse_days(&inactivity_days)
            .map_err(|e| ConfigError::InvalidEnvVar("MIAN_INACTIVITY_DAYS".to_string(), e))?;

        Ok(Self {
            database_url,
            inactivity_days,
        })
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

fn parse_days(value: &str) -> Result<i64, String> {
    let days = value.trim().parse::<i64>().map_err(|e| e.to_string())?;
    if days < 0 {
        return Err("must not be negative".to_string());
    }
    Ok(days)
}
