//! Outbound client for the upstream booking API.
//!
//! # Responsibilities
//! - Build one upstream request per inbound call
//! - Inject the credential header (the only place the secret is used)
//! - Relay upstream status, content type and body untouched
//!
//! # Design Decisions
//! - TLS certificates and hostnames are always verified (reqwest defaults)
//! - Upstream 4xx/5xx are responses, not errors; only transport failures error
//! - Redirects are not followed; the upstream's answer is relayed as-is
//! - One attempt per call, bounded by the configured timeout

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};

use crate::config::UpstreamConfig;
use crate::upstream::url::{join_upstream_url, with_query};

/// Content type assumed when the upstream omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body forwarded on mutating methods.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardBody {
    /// Raw JSON bytes, forwarded byte-for-byte.
    Json(Bytes),
    /// Form fields, re-encoded as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// A validated call ready to be sent upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedRequest {
    pub method: Method,
    /// Allowlisted target path.
    pub path: String,
    /// Query pairs (GET only; already stripped of `path`).
    pub query: Vec<(String, String)>,
    pub body: Option<ForwardBody>,
}

/// What came back from the upstream.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

/// Failure to complete an upstream call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream client could not be built: {0}")]
    Build(String),

    #[error("credential is not a valid header value")]
    InvalidCredential,

    #[error("upstream request timed out")]
    Timeout,

    #[error("could not connect to upstream: {0}")]
    Connect(String),

    #[error("failed to read upstream response: {0}")]
    Body(String),

    #[error("upstream transport error: {0}")]
    Transport(String),
}

impl UpstreamError {
    /// Low-sensitivity description safe to hand back to the browser.
    pub fn public_detail(&self) -> &'static str {
        match self {
            UpstreamError::Timeout => "Request timed out",
            UpstreamError::Connect(_) => "Connection failed",
            UpstreamError::Body(_) => "Failed to read upstream response",
            _ => "Transport error",
        }
    }

    fn classify(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_connect() {
            UpstreamError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            UpstreamError::Body(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// HTTP client bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key_header: HeaderName,
}

impl UpstreamClient {
    /// Create a client from validated configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let api_key_header = HeaderName::from_bytes(config.api_key_header.as_bytes())
            .map_err(|e| UpstreamError::Build(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key_header,
        })
    }

    /// Full URL a request would be sent to.
    pub fn url_for(&self, request: &ProxiedRequest) -> String {
        with_query(join_upstream_url(&self.base_url, &request.path), &request.query)
    }

    /// Send one request upstream with the credential attached.
    pub async fn send(
        &self,
        request: &ProxiedRequest,
        secret: &SecretString,
    ) -> Result<ProxiedResponse, UpstreamError> {
        let mut key = HeaderValue::from_str(secret.expose_secret())
            .map_err(|_| UpstreamError::InvalidCredential)?;
        key.set_sensitive(true);

        let mut builder = self
            .http
            .request(request.method.clone(), self.url_for(request))
            .header(header::ACCEPT, "application/json")
            .header(self.api_key_header.clone(), key);

        builder = match &request.body {
            Some(ForwardBody::Json(raw)) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(raw.clone()),
            Some(ForwardBody::Form(fields)) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encode_form(fields)),
            None => builder,
        };

        let response = builder.send().await.map_err(UpstreamError::classify)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let body = response.bytes().await.map_err(UpstreamError::classify)?;

        Ok(ProxiedResponse {
            status,
            content_type,
            body,
        })
    }
}

fn encode_form(fields: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}
