//! Tracing subscriber setup for the process embedding the shop.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set. Target matching is by prefix, so
/// this covers every `mian_bakery_*` crate.
pub const DEFAULT_FILTER: &str = "mian_bakery=info";

/// Install the global tracing subscriber.
///
/// Log lines are JSON when `MIAN_LOG_JSON=1`, human-readable text otherwise.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let json = std::env::var("MIAN_LOG_JSON").is_ok_and(|v| v == "1");
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber is process-wide, so both installs live in one test.
    #[test]
    fn test_init_tracing_installs_once() {
        assert!(init_tracing().is_ok());
        assert!(init_tracing().is_err());
    }
}
