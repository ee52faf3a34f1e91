//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated configuration into a ready `Gateway`
//! - Compile the allowlist, pick the secret provider, build the upstream client
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The credential is not read here; it is loaded per request

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::credential;
use crate::gateway::Gateway;
use crate::routing::Allowlist;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Error raised while assembling the gateway.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("allowlist pattern does not compile: {0}")]
    Allowlist(#[from] regex::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Build the gateway described by the configuration.
pub fn build_gateway(config: &GatewayConfig) -> Result<Gateway, StartupError> {
    let allowlist = Allowlist::from_config(&config.allowlist)?;
    let secrets = credential::from_config(&config.credential);
    let upstream = UpstreamClient::from_config(&config.upstream)?;

    tracing::info!(
        allowlist_entries = allowlist.len(),
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "Gateway assembled"
    );

    Ok(Gateway::new(Arc::new(allowlist), secrets, upstream))
}
