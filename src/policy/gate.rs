//! Root page login gate.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};

use crate::cookies::{ClientIdentity, CookieStore};
use crate::http::response::found;
use crate::observability::metrics;
use crate::policy::RoutePolicy;

/// Sends clients with no captured cookies from `/` to the login page.
///
/// Only the exact root path is gated; everything else under the route's
/// prefix falls through untouched. A client without a User-Agent is never
/// let through.
#[derive(Debug, Clone)]
pub struct RootGate {
    store: CookieStore,
    login: HeaderValue,
}

impl RootGate {
    pub fn new(store: CookieStore, login: HeaderValue) -> Self {
        Self { store, login }
    }
}

impl RoutePolicy for RootGate {
    fn should_bypass(&self, req: &Request<Body>, identity: &ClientIdentity) -> Option<Response> {
        if req.uri().path() != "/" {
            return None;
        }
        if !identity.is_anonymous() && self.store.has(identity) {
            return None;
        }

        tracing::info!(identity = %identity, login = ?self.login, "Anonymous client, redirecting to login");
        metrics::record_root_redirect();
        Some(found(self.login.clone()))
    }
}
