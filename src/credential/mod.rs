//! Upstream credential subsystem.
//!
//! # Data Flow
//! ```text
//! CredentialConfig (file | env)
//!     → provider.rs (SecretProvider impl chosen at startup)
//!     → Gateway calls load() once per request
//!     → SecretString handed to the upstream client only
//! ```
//!
//! # Design Decisions
//! - Fail closed: unreadable or empty secrets stop the request with a 500
//! - Secrets are `SecretString`: redacted Debug, never serialized
//! - The failure reason is logged, never returned to the browser

pub mod provider;

pub use provider::{
    from_config, CredentialError, EnvSecretProvider, FileSecretProvider, SecretProvider,
    StaticSecretProvider,
};
