//! The gateway: validate, inject the credential, forward once.

use std::sync::Arc;

use axum::http::Method;
use secrecy::SecretString;

use crate::credential::SecretProvider;
use crate::gateway::{GatewayError, InboundCall};
use crate::routing::Allowlist;
use crate::security::is_host_injection;
use crate::upstream::url::forwarded_query;
use crate::upstream::{ForwardBody, ProxiedRequest, ProxiedResponse, UpstreamClient, UpstreamError};

/// Characters stripped from both ends of the target path.
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Stateless request handler. Everything it holds is read-only.
#[derive(Clone)]
pub struct Gateway {
    allowlist: Arc<Allowlist>,
    secrets: Arc<dyn SecretProvider>,
    upstream: UpstreamClient,
}

impl Gateway {
    pub fn new(
        allowlist: Arc<Allowlist>,
        secrets: Arc<dyn SecretProvider>,
        upstream: UpstreamClient,
    ) -> Self {
        Self {
            allowlist,
            secrets,
            upstream,
        }
    }

    /// Handle one call. Checks run in a fixed order and the first failure
    /// wins; nothing is sent upstream unless every check passes.
    pub async fn handle(&self, call: InboundCall) -> Result<ProxiedResponse, GatewayError> {
        let secret = self.credential().await?;
        self.forward(call, &secret).await
    }

    /// Load the upstream key. Any failure is a configuration error.
    pub async fn credential(&self) -> Result<SecretString, GatewayError> {
        self.secrets.load().await.map_err(|e| {
            tracing::error!(error = %e, "Upstream credential unavailable");
            GatewayError::Configuration
        })
    }

    /// Every check after the credential, then the upstream call.
    pub async fn forward(
        &self,
        call: InboundCall,
        secret: &SecretString,
    ) -> Result<ProxiedResponse, GatewayError> {
        let json = call.json_body()?;
        let request = self
            .validate(&call, json.is_some(), call.target_path(json.as_ref()))
            .await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "Forwarding to upstream"
        );

        self.upstream
            .send(&request, secret)
            .await
            .map_err(|e| match e {
                UpstreamError::InvalidCredential => {
                    tracing::error!("Upstream credential is not a valid header value");
                    GatewayError::Configuration
                }
                other => {
                    tracing::warn!(error = %other, "Upstream request failed");
                    GatewayError::Upstream(other)
                }
            })
    }

    /// Path and method checks, producing the request to forward.
    async fn validate(
        &self,
        call: &InboundCall,
        body_is_json: bool,
        raw_path: Option<String>,
    ) -> Result<ProxiedRequest, GatewayError> {
        let path = raw_path
            .as_deref()
            .map(|p| p.trim_matches(TRIMMED))
            .filter(|p| !p.is_empty())
            .ok_or(GatewayError::MissingPath)?;

        if is_host_injection(path) {
            tracing::debug!("Rejected path with scheme or host");
            return Err(GatewayError::InvalidPath);
        }

        if !self.allowlist.is_allowed(path) {
            tracing::debug!("Rejected path outside the allowlist");
            return Err(GatewayError::NotFound);
        }

        let (query, body) = match call.method {
            Method::GET => (forwarded_query(call.query.as_deref()), None),
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE => {
                let body = if body_is_json {
                    ForwardBody::Json(call.body.clone())
                } else {
                    ForwardBody::Form(call.form_fields().await)
                };
                (Vec::new(), Some(body))
            }
            _ => return Err(GatewayError::MethodNotAllowed),
        };

        Ok(ProxiedRequest {
            method: call.method.clone(),
            path: path.to_string(),
            query,
            body,
        })
    }
}
