//! Client identity derived from request metadata.
//!
//! The identity is the raw `User-Agent` header. It is not a unique client
//! identifier: two browsers with the same User-Agent share one cookie entry.

use std::fmt;

use axum::http::{header, HeaderMap};

/// Key used to partition the cookie store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derive the identity from request headers.
    ///
    /// A missing User-Agent maps to the empty identity. Non-UTF-8 bytes are
    /// decoded lossily so that such clients still get a stable key.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::USER_AGENT)
            .map(|v| Self(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for requests that carried no User-Agent.
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        let id = ClientIdentity::from_headers(&headers);
        assert_eq!(id.as_str(), "Mozilla/5.0");
        assert!(!id.is_anonymous());
    }

    #[test]
    fn test_missing_user_agent() {
        let id = ClientIdentity::from_headers(&HeaderMap::new());
        assert_eq!(id, ClientIdentity::default());
        assert!(id.is_anonymous());
    }

    #[test]
    fn test_non_utf8_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_bytes(b"agent\xff").unwrap(),
        );
        let id = ClientIdentity::from_headers(&headers);
        assert!(id.as_str().starts_with("agent"));
    }
}
