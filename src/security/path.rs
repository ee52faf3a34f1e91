//! Target path guard.
//!
//! Rejects values that try to smuggle a scheme or host into the upstream
//! URL. Runs before the allowlist so injection attempts get a 400 instead
//! of a 404.

/// Returns true if the path embeds a scheme separator or is
/// protocol-relative (`//host/...`).
pub fn is_host_injection(path: &str) -> bool {
    path.contains("://") || path.starts_with("//")
}
