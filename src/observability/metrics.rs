//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): calls by method, status, outcome
//! - `gateway_request_duration_seconds` (histogram): latency by outcome
//!
//! `outcome` is one of `forwarded`, `rejected`, `upstream_error`,
//! `config_error`. `method` is one of the standard verbs or `OTHER`.
//! Paths are not used as labels.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Outcome label for calls relayed to the upstream.
pub const OUTCOME_FORWARDED: &str = "forwarded";

/// Start the Prometheus scrape endpoint. Must run inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Bounded label for a request method. Extension methods collapse to `OTHER`.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Record one gateway call.
pub fn record_request(method: &'static str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method,
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!("gateway_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
