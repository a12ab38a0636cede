//! # Structured Logging
//!
//! Environment-aware tracing initialization. Development environments get
//! human-readable console output; production gets JSON lines for shipping.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// Safe to call repeatedly; later calls are no-ops, and an already-installed
/// global subscriber (e.g. from a test harness) is left in place.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_level(&environment)));

        let result = if environment == "production" {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .try_init()
        } else {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .try_init()
        };

        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}

fn get_environment() -> String {
    std::env::var("LOMIS_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
