//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tower-http TraceLayer (per-request spans, wired in http::server)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the `x-request-id` header into every log line
//! - Metrics are recorded through the `metrics` facade; a no-op when no
//!   exporter is installed

pub mod logging;
pub mod metrics;
