//! Set-Cookie parsing and Cookie header serialization.
//!
//! # Responsibilities
//! - Extract the leading `name=value` pair from each Set-Cookie string
//! - Discard every attribute after the first `;`
//! - Render pairs back into a single `Cookie` request header value
//!
//! # Design Decisions
//! - One result per header string; a bad string never aborts the batch
//! - A missing `;` terminator is accepted (`sid=abc` is a valid Set-Cookie)
//! - Name and value are trimmed of surrounding whitespace

use std::fmt;

use thiserror::Error;

use crate::observability::metrics;

/// A single cookie name and value, attributes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePair {
    pub name: String,
    pub value: String,
}

impl CookiePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for CookiePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={};", self.name, self.value)
    }
}

/// Reasons a Set-Cookie string cannot yield a pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieParseError {
    #[error("no '=' before the first ';' in {raw:?}")]
    MissingEquals { raw: String },

    #[error("empty cookie name in {raw:?}")]
    EmptyName { raw: String },
}

/// Parse one raw Set-Cookie header value.
pub fn parse_set_cookie(raw: &str) -> Result<CookiePair, CookieParseError> {
    let segment = match raw.find(';') {
        Some(end) => &raw[..end],
        None => raw,
    };

    let (name, value) = segment
        .split_once('=')
        .ok_or_else(|| CookieParseError::MissingEquals {
            raw: raw.to_string(),
        })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(CookieParseError::EmptyName {
            raw: raw.to_string(),
        });
    }

    Ok(CookiePair::new(name, value.trim()))
}

/// Parse a batch of Set-Cookie header values, skipping malformed ones.
pub fn parse<I, S>(headers: I) -> Vec<CookiePair>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    headers
        .into_iter()
        .filter_map(|raw| match parse_set_cookie(raw.as_ref()) {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed Set-Cookie");
                metrics::record_cookie_parse_failure();
                None
            }
        })
        .collect()
}

/// Render pairs as a `Cookie` header value (`a=1;b=2;`).
pub fn serialize<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = &'a CookiePair>,
{
    pairs.into_iter().map(ToString::to_string).collect()
}
