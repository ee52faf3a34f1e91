//! Allowlist lookup.
//!
//! # Responsibilities
//! - Store compiled path matchers in configuration order
//! - Answer "is this upstream path permitted" in one place
//!
//! # Design Decisions
//! - Immutable after construction
//! - Linear scan, first match wins
//! - Unknown paths are simply not allowed

use crate::config::AllowlistConfig;
use crate::routing::matcher::{ExactMatcher, PathMatcher, PatternMatcher};

/// Ordered set of permitted upstream path shapes.
#[derive(Debug, Default)]
pub struct Allowlist {
    matchers: Vec<Box<dyn PathMatcher>>,
}

impl Allowlist {
    /// Build an allowlist from explicit matchers.
    pub fn new(matchers: Vec<Box<dyn PathMatcher>>) -> Self {
        Self { matchers }
    }

    /// Compile the configured entries: exact paths first, then patterns.
    pub fn from_config(config: &AllowlistConfig) -> Result<Self, regex::Error> {
        let mut matchers: Vec<Box<dyn PathMatcher>> =
            Vec::with_capacity(config.exact.len() + config.patterns.len());
        for path in &config.exact {
            matchers.push(Box::new(ExactMatcher::new(path.clone())));
        }
        for pattern in &config.patterns {
            matchers.push(Box::new(Self::compile_pattern(pattern)?));
        }
        Ok(Self { matchers })
    }

    /// Compile one pattern entry the same way `from_config` does.
    pub fn compile_pattern(pattern: &str) -> Result<PatternMatcher, regex::Error> {
        PatternMatcher::new(pattern)
    }

    /// Returns true if any entry permits the path.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
