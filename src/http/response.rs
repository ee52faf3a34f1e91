//! Response handling and transformation.
//!
//! # Responsibilities
//! - Mirror the upstream status and content type to the browser
//! - Pass the upstream body through untouched
//!
//! # Design Decisions
//! - Upstream headers other than Content-Type are dropped
//! - Error responses are rendered by `GatewayError` itself

use axum::body::Body;
use axum::http::header;
use axum::response::Response;

use crate::upstream::ProxiedResponse;

/// Turn an upstream answer into the browser response.
pub fn mirror(upstream: ProxiedResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, upstream.content_type);
    response
}
