//! Booking API gateway.
//!
//! # Data Flow
//! ```text
//! InboundCall (method, raw query, content type, body)
//!     → credential available?          no → 500
//!     → JSON body parses (if JSON)?    no → 400
//!     → `path` present?                no → 400
//!     → no scheme / host injection?    no → 400
//!     → on the allowlist?              no → 404
//!     → method forwardable?            no → 405
//!     → upstream call                  transport failure → 502
//!     → ProxiedResponse (status, content type, body mirrored)
//! ```
//!
//! # Design Decisions
//! - Unknown and forbidden paths are both 404 so paths cannot be enumerated
//! - The credential is added server-side only; client headers are not forwarded
//! - Error messages are generic; causes go to the log

pub mod error;
pub mod inbound;
pub mod service;

pub use error::{ErrorEnvelope, GatewayError, ALLOWED_METHODS};
pub use inbound::InboundCall;
pub use service::Gateway;
