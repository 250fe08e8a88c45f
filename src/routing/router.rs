//! Request classification.
//!
//! # Responsibilities
//! - Hold the compiled API prefix matcher
//! - Decide, per request path, between proxying and static serving
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - The API prefix is checked before anything else, so a path under the
//!   prefix can never be served from disk even if a file of that name exists

use crate::config::UpstreamConfig;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Where a request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Forward to the upstream with the prefix stripped.
    Proxy,
    /// Serve from the asset root, or the fallback document.
    Static,
}

/// Classifies requests by path prefix.
#[derive(Debug, Clone)]
pub struct Router {
    api: PathPrefixMatcher,
}

impl Router {
    pub fn new(api_prefix: impl Into<String>) -> Self {
        Self {
            api: PathPrefixMatcher::new(api_prefix),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.api_prefix.clone())
    }

    /// Classify a request path. Pure: the same path always yields the same target.
    pub fn classify(&self, path: &str) -> Dispatch {
        if self.api.matches(path) {
            Dispatch::Proxy
        } else {
            Dispatch::Static
        }
    }

    pub fn api_prefix(&self) -> &str {
        self.api.prefix()
    }
}
