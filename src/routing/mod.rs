//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Validated target path (from `?path=` or the JSON body)
//!     → allowlist.rs (ordered scan)
//!     → matcher.rs (exact or pattern entry)
//!     → Return: allowed or not
//!
//! Allowlist Compilation (at startup):
//!     AllowlistConfig
//!     → exact entries, then patterns
//!     → Compile anchored regexes
//!     → Freeze as immutable Allowlist
//! ```
//!
//! # Design Decisions
//! - Allowlist compiled at startup, immutable at runtime
//! - The allowlist is the only authorization boundary for upstream paths
//! - First match wins

pub mod allowlist;
pub mod matcher;

pub use allowlist::Allowlist;
pub use matcher::{ExactMatcher, PathMatcher, PatternMatcher};
