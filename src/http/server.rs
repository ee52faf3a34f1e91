//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway and health handlers
//! - Wire up middleware (tracing, timeout, request ID, security headers)
//! - Optionally serve the static marketing site on the same origin
//! - Bind server to listener, plain or TLS
//! - Dispatch gateway calls and record metrics

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::HEALTH_PATH;
use crate::config::GatewayConfig;
use crate::gateway::{Gateway, GatewayError};
use crate::http::request::{inbound_call, read_body, request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::mirror;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::security::apply_security_headers;
use crate::upstream::ProxiedResponse;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    /// Largest inbound body accepted, in bytes.
    pub max_body_size: usize,
}

/// HTTP server for the booking gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an assembled gateway.
    pub fn new(config: GatewayConfig, gateway: Gateway) -> Self {
        let state = AppState {
            gateway,
            max_body_size: config.security.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route(&config.gateway.mount_path, any(gateway_handler))
            .route(HEALTH_PATH, get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        // The site gets no CSP: the hardening set is for the JSON endpoints.
        let mut app = apply_security_headers(api);
        if let Some(dir) = &config.site.static_dir {
            app = app.fallback_service(ServeDir::new(dir));
        }

        app.layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.gateway.mount_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS until the shutdown signal fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %addr,
            mount_path = %self.config.gateway.mount_path,
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        let grace = Duration::from_secs(self.config.timeouts.request_secs);
        tokio::spawn(async move {
            shutdown::wait(shutdown_rx).await;
            drain.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Gateway handler: one inbound call, at most one upstream call.
async fn gateway_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let method_label = metrics::method_label(&method);
    let method_str = method.to_string();

    match dispatch(&state, method, query, &headers, body).await {
        Ok(upstream) => {
            tracing::info!(
                request_id = %request_id,
                method = %method_str,
                status = upstream.status.as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Proxied request"
            );
            metrics::record_request(
                method_label,
                upstream.status.as_u16(),
                metrics::OUTCOME_FORWARDED,
                start_time,
            );
            mirror(upstream)
        }
        Err(err) => {
            let status = err.status();
            tracing::info!(
                request_id = %request_id,
                method = %method_str,
                status = status.as_u16(),
                error = %err,
                "Gateway rejected request"
            );
            metrics::record_request(method_label, status.as_u16(), err.outcome(), start_time);
            err.into_response()
        }
    }
}

/// Credential first, then the body is read under the size limit.
async fn dispatch(
    state: &AppState,
    method: Method,
    query: Option<String>,
    headers: &HeaderMap,
    body: Body,
) -> Result<ProxiedResponse, GatewayError> {
    let secret = state.gateway.credential().await?;
    let body = read_body(headers, body, state.max_body_size).await?;
    state
        .gateway
        .forward(inbound_call(method, query, headers, body), &secret)
        .await
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

/// Liveness probe. Does not touch the upstream or the credential.
async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::credential::StaticSecretProvider;
    use crate::routing::Allowlist;
    use crate::upstream::UpstreamClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn server(config: GatewayConfig, secrets: StaticSecretProvider) -> HttpServer {
        let upstream = UpstreamClient::from_config(&UpstreamConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..UpstreamConfig::default()
        })
        .unwrap();
        let gateway = Gateway::new(
            Arc::new(Allowlist::from_config(&config.allowlist).unwrap()),
            Arc::new(secrets),
            upstream,
        );
        HttpServer::new(config, gateway)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = server(GatewayConfig::default(), StaticSecretProvider::missing()).router();
        let res = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(res.headers()["x-frame-options"], "DENY");
        assert_eq!(body_json(res).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_rejection_carries_envelope_and_headers() {
        let app = server(GatewayConfig::default(), StaticSecretProvider::new("k")).router();
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api.php?path=/v1/secret-admin")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()["x-request-id"], "req-42");
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");
        assert_eq!(body_json(res).await, serde_json::json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let app = server(GatewayConfig::default(), StaticSecretProvider::missing()).router();
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api.php?path=/v1/fleet")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "error": "Server configuration error: API key not set." })
        );
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_with_headers() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let app = server(config, StaticSecretProvider::new("k")).router();
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api.php?path=/v1/bookings")
                    .header("content-type", "application/json")
                    .header("content-length", "64")
                    .body(Body::from(vec![b' '; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(res.headers()["x-frame-options"], "DENY");
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "error": "Request body too large" })
        );
    }

    #[tokio::test]
    async fn test_missing_credential_wins_over_body_limit() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let app = server(config, StaticSecretProvider::missing()).router();
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api.php?path=/v1/bookings")
                    .header("content-type", "application/json")
                    .header("content-length", "64")
                    .body(Body::from(vec![b' '; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({ "error": "Server configuration error: API key not set." })
        );
    }

    #[tokio::test]
    async fn test_static_site_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Limo</h1>").unwrap();

        let mut config = GatewayConfig::default();
        config.site.static_dir = Some(dir.path().to_path_buf());
        let app = server(config, StaticSecretProvider::new("k")).router();

        let res = app
            .clone()
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key("content-security-policy"));

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api.php?path=//evil")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
