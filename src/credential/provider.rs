//! Secret providers for the upstream API key.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::CredentialConfig;

/// Why a secret could not be produced. Never shown to clients.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("secret source is unavailable: {0}")]
    Unavailable(String),

    #[error("secret is empty")]
    Empty,
}

/// Source of the upstream credential.
///
/// Implementations fail closed: anything short of a non-empty secret is an
/// error, and the gateway refuses to forward.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn load(&self) -> Result<SecretString, CredentialError>;
}

/// Build the provider described by the configuration.
pub fn from_config(config: &CredentialConfig) -> Arc<dyn SecretProvider> {
    match config {
        CredentialConfig::File { path } => Arc::new(FileSecretProvider::new(path.clone())),
        CredentialConfig::Env { var } => Arc::new(EnvSecretProvider::new(var.clone())),
    }
}

fn non_empty(raw: &str) -> Result<SecretString, CredentialError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::Empty);
    }
    Ok(SecretString::from(trimmed.to_string()))
}

/// Reads the key from a file on every call, so a rotated key is picked up
/// without a restart.
#[derive(Debug, Clone)]
pub struct FileSecretProvider {
    path: PathBuf,
}

impl FileSecretProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn load(&self) -> Result<SecretString, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CredentialError::Unavailable(e.kind().to_string()))?;
        non_empty(&raw)
    }
}

/// Reads the key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    var: String,
}

impl EnvSecretProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn load(&self) -> Result<SecretString, CredentialError> {
        let raw = std::env::var(&self.var)
            .map_err(|_| CredentialError::Unavailable(format!("{} is not set", self.var)))?;
        non_empty(&raw)
    }
}

/// Fixed in-memory key, or none at all. Used by tests and embedders.
#[derive(Debug)]
pub struct StaticSecretProvider {
    secret: Option<SecretString>,
}

impl StaticSecretProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(SecretString::from(secret.into())),
        }
    }

    /// A provider that never has a key.
    pub fn missing() -> Self {
        Self { secret: None }
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn load(&self) -> Result<SecretString, CredentialError> {
        match &self.secret {
            Some(secret) => non_empty(secret.expose_secret()),
            None => Err(CredentialError::Unavailable("no secret configured".to_string())),
        }
    }
}
