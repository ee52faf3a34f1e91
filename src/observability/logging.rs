//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Pick the pretty or JSON formatter
//!
//! # Design Decisions
//! - `LIMO_GATEWAY_LOG`, then `RUST_LOG`, override the configured level
//! - Credentials and request bodies are never recorded as fields

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Environment variable with filter directives for this service.
pub const LOG_ENV: &str = "LIMO_GATEWAY_LOG";

/// Build the level filter from the environment or the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "limo_gateway={level},tower_http={level}",
                level = config.log_level
            ))
        })
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    if config.log_format == "json" {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}
