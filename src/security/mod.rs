//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → body size limit (tower-http, wired in http::server)
//!     → path.rs (reject scheme/host injection in the target path)
//!     → Pass to the allowlist
//!
//! Outgoing response:
//!     → headers.rs (nosniff, deny framing, no-referrer, CSP)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod headers;
pub mod path;

pub use headers::apply_security_headers;
pub use path::is_host_injection;
