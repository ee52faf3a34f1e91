//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream base URL and the allowlist compile
//! - Keep the credential out of the public web root
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

use axum::http::HeaderName;
use url::Url;

use crate::config::schema::{CredentialConfig, GatewayConfig};
use crate::routing::Allowlist;

/// Route reserved for the liveness probe.
pub const HEALTH_PATH: &str = "/healthz";

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("gateway.mount_path `{0}` must start with `/` and not be `/` or the health route")]
    MountPath(String),

    #[error("upstream.base_url is invalid: {0}")]
    BaseUrl(String),

    #[error("upstream.api_key_header `{0}` is not a valid header name")]
    ApiKeyHeader(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    UpstreamTimeout,

    #[error("timeouts.request_secs ({request}) must exceed upstream.timeout_secs ({upstream})")]
    RequestTimeout { request: u64, upstream: u64 },

    #[error("allowlist must contain at least one entry")]
    EmptyAllowlist,

    #[error("allowlist entry `{0}` must start with `/`")]
    AllowlistEntry(String),

    #[error("allowlist pattern `{pattern}` does not compile: {reason}")]
    AllowlistPattern { pattern: String, reason: String },

    #[error("credential.var must not be empty")]
    CredentialVar,

    #[error("credential file must not live inside site.static_dir")]
    CredentialInWebRoot,

    #[error("security.max_body_size must be greater than zero")]
    MaxBodySize,

    #[error("observability.log_format `{0}` must be `pretty` or `json`")]
    LogFormat(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let mount = &config.gateway.mount_path;
    if !mount.starts_with('/') || mount == "/" || mount == HEALTH_PATH {
        errors.push(ValidationError::MountPath(mount.clone()));
    }

    if let Err(reason) = check_base_url(&config.upstream.base_url) {
        errors.push(ValidationError::BaseUrl(reason));
    }

    if HeaderName::from_bytes(config.upstream.api_key_header.as_bytes()).is_err() {
        errors.push(ValidationError::ApiKeyHeader(config.upstream.api_key_header.clone()));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::UpstreamTimeout);
    }
    if config.timeouts.request_secs <= config.upstream.timeout_secs {
        errors.push(ValidationError::RequestTimeout {
            request: config.timeouts.request_secs,
            upstream: config.upstream.timeout_secs,
        });
    }

    let allow = &config.allowlist;
    if allow.exact.is_empty() && allow.patterns.is_empty() {
        errors.push(ValidationError::EmptyAllowlist);
    }
    for entry in allow.exact.iter().chain(allow.patterns.iter()) {
        if !entry.starts_with('/') {
            errors.push(ValidationError::AllowlistEntry(entry.clone()));
        }
    }
    for pattern in &allow.patterns {
        if let Err(e) = Allowlist::compile_pattern(pattern) {
            errors.push(ValidationError::AllowlistPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    match &config.credential {
        CredentialConfig::Env { var } if var.trim().is_empty() => {
            errors.push(ValidationError::CredentialVar);
        }
        CredentialConfig::File { path } => {
            if let Some(root) = &config.site.static_dir {
                if is_within(path, root) {
                    errors.push(ValidationError::CredentialInWebRoot);
                }
            }
        }
        CredentialConfig::Env { .. } => {}
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::MaxBodySize);
    }

    let obs = &config.observability;
    if obs.log_format != "pretty" && obs.log_format != "json" {
        errors.push(ValidationError::LogFormat(obs.log_format.clone()));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "https" => {}
        "http" => tracing::warn!(
            base_url = %raw,
            "Upstream base URL is plain http; the API key will travel unencrypted"
        ),
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}

/// Lexical containment check; both paths are normalized without touching disk.
fn is_within(path: &Path, root: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
