//! In-memory cookie jar keyed by client identity.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cookies::codec::{self, CookiePair};
use crate::cookies::identity::ClientIdentity;
use crate::observability::metrics;

/// Cookies held for one client, unique by name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieEntry {
    pairs: Vec<CookiePair>,
}

impl CookieEntry {
    /// Insert or overwrite a cookie. An overwritten cookie keeps its position.
    pub fn set(&mut self, pair: CookiePair) {
        match self.pairs.iter_mut().find(|p| p.name == pair.name) {
            Some(existing) => existing.value = pair.value,
            None => self.pairs.push(pair),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Render as a `Cookie` header value.
    pub fn render(&self) -> String {
        codec::serialize(&self.pairs)
    }
}

/// A thread-safe cookie store shared by the route policies.
///
/// Cloning is cheap and yields a handle to the same underlying map.
/// Entries are created on the first merge that carries at least one pair
/// and are never removed.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    inner: Arc<DashMap<ClientIdentity, CookieEntry>>,
}

impl CookieStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge cookies into the identity's entry.
    ///
    /// Existing names are overwritten, other names are left untouched.
    /// An empty `pairs` never creates an entry.
    pub fn merge<I>(&self, identity: &ClientIdentity, pairs: I)
    where
        I: IntoIterator<Item = CookiePair>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_none() {
            return;
        }

        {
            let mut entry = self.inner.entry(identity.clone()).or_default();
            for pair in pairs {
                entry.set(pair);
            }
        }

        metrics::record_cookie_identities(self.inner.len());
    }

    /// True if any cookie has been captured for this identity.
    pub fn has(&self, identity: &ClientIdentity) -> bool {
        self.inner.contains_key(identity)
    }

    /// Render the identity's cookies as a `Cookie` header value.
    /// Returns an empty string when nothing is stored.
    pub fn render(&self, identity: &ClientIdentity) -> String {
        self.inner
            .get(identity)
            .map(|entry| entry.render())
            .unwrap_or_default()
    }

    /// Snapshot of the identity's entry.
    pub fn get(&self, identity: &ClientIdentity) -> Option<CookieEntry> {
        self.inner.get(identity).map(|r| r.value().clone())
    }

    /// Number of identities with stored cookies.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
