//! Path matching logic.
//!
//! # Responsibilities
//! - Match a target path exactly (byte-for-byte, case-sensitive)
//! - Match a target path against an anchored regular expression
//!
//! # Design Decisions
//! - Matchers see the raw target path only, never a decoded variant
//! - Patterns are anchored at compile time so they always match the whole path

use regex::Regex;

/// Trait for matching a target path against one allowlist entry.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path is permitted by this entry.
    fn matches(&self, path: &str) -> bool;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    path: String,
}

impl ExactMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PathMatcher for ExactMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Matches paths carrying a parameterized segment, e.g. a booking id.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compile a pattern. The expression must match the entire path.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { regex })
    }
}

impl PathMatcher for PatternMatcher {
    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}
