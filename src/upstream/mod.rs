//! Upstream booking API subsystem.
//!
//! # Data Flow
//! ```text
//! ProxiedRequest (validated path, query or body)
//!     → url.rs (base + path join, query re-encoding)
//!     → client.rs (credential header, Accept, body, timeout)
//!     → Upstream booking API
//!     → ProxiedResponse (status, content type, raw body)
//! ```

pub mod client;
pub mod url;

pub use client::{
    ForwardBody, ProxiedRequest, ProxiedResponse, UpstreamClient, UpstreamError,
    DEFAULT_CONTENT_TYPE,
};
