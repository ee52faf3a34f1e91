//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the booking gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Where the gateway endpoint is mounted.
    pub gateway: EndpointConfig,

    /// Upstream booking API settings.
    pub upstream: UpstreamConfig,

    /// Where the upstream API key is read from.
    pub credential: CredentialConfig,

    /// Permitted upstream paths.
    pub allowlist: AllowlistConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Security hardening settings.
    pub security: SecurityConfig,

    /// Static marketing site.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Public endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Route the browser calls with `?path=...`.
    pub mount_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            mount_path: "/api.php".to_string(),
        }
    }
}

/// Upstream booking API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every allowlisted path is joined onto.
    pub base_url: String,

    /// Header carrying the API key.
    pub api_key_header: String,

    /// Total time allowed for one upstream call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.limoanywhere.com".to_string(),
            api_key_header: "X-Api-Key".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Source of the upstream API key.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum CredentialConfig {
    /// Read from a file kept outside the public web root.
    File { path: PathBuf },
    /// Read from an environment variable.
    Env { var: String },
}

impl Default for CredentialConfig {
    fn default() -> Self {
        CredentialConfig::File {
            path: PathBuf::from("secure_config/limo_anywhere_key"),
        }
    }
}

/// Allowlisted upstream paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Paths that must match exactly.
    pub exact: Vec<String>,

    /// Regular expressions that must match the whole path.
    pub patterns: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            exact: vec![
                "/v1/fleet".to_string(),
                "/v1/fleet/available".to_string(),
                "/v1/fleet/pricing".to_string(),
                "/v1/bookings".to_string(),
                "/v1/test-connection".to_string(),
            ],
            patterns: vec![
                "/v1/bookings/[A-Za-z0-9_-]+".to_string(),
                "/v1/bookings/[A-Za-z0-9_-]+/cancel".to_string(),
            ],
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 35 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Public web root served for every non-gateway route.
    pub static_dir: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
