//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefixes are plain string prefixes: `/api` also matches `/apiary`

use axum::body::Body;
use axum::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.uri().path().starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::default()).unwrap()
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        assert!(matcher.matches(&req("http://localhost:8080/api/v1")));
        assert!(matcher.matches(&req("/api")));
        assert!(matcher.matches(&req("/apiary")));
        assert!(!matcher.matches(&req("/images")));
        assert!(!matcher.matches(&req("/API/v1")));
    }

    #[test]
    fn test_root_prefix_matches_everything() {
        let matcher = PathPrefixMatcher::new("/");
        assert!(matcher.matches(&req("/")));
        assert!(matcher.matches(&req("/static/app.js")));
    }

    #[test]
    fn test_query_ignored() {
        let matcher = PathPrefixMatcher::new("/login");
        assert!(matcher.matches(&req("/login?service=http%3A%2F%2Fx")));
        assert!(!matcher.matches(&req("/?next=/login")));
    }
}
