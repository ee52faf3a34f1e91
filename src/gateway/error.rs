//! Gateway error taxonomy and its HTTP mapping.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::upstream::UpstreamError;

/// Methods the gateway forwards, as advertised on 405 responses.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE";

/// Every way a gateway call can fail before or while reaching upstream.
///
/// Display strings are exactly what the browser sees in `error`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The credential could not be loaded. The cause is only logged.
    #[error("Server configuration error: API key not set.")]
    Configuration,

    #[error("Invalid JSON in request body.")]
    InvalidJson,

    #[error("Missing required parameter: path")]
    MissingPath,

    #[error("Invalid path value.")]
    InvalidPath,

    /// Not on the allowlist. Always 404, never 403.
    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Upstream request failed")]
    Upstream(#[source] UpstreamError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::InvalidJson
            | GatewayError::MissingPath
            | GatewayError::InvalidPath => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Metrics label for the failure class.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Configuration => "config_error",
            GatewayError::Upstream(_) => "upstream_error",
            _ => "rejected",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.to_string(),
            details: match self {
                GatewayError::Upstream(e) => Some(e.public_detail().to_string()),
                _ => None,
            },
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = serde_json::to_vec(&self.envelope())
            .unwrap_or_else(|_| br#"{"error":"Internal error"}"#.to_vec());

        let mut response = (
            self.status(),
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )],
            body,
        )
            .into_response();

        if matches!(self, GatewayError::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}
