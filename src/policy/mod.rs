//! Route policies: the hooks that run around proxying.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → should_bypass      (root gate may answer here, nothing forwarded)
//!     → on_proxy_request   (API relay sets the Cookie header)
//!     → upstream
//!     → on_proxy_response  (relays capture Set-Cookie, login rewrites 302)
//!     → browser
//! ```
//!
//! # Design Decisions
//! - One trait with no-op defaults; each policy overrides only its hooks
//! - Policies hold a `CookieStore` handle given at construction
//! - Hooks are synchronous and infallible; failures are logged and skipped

use axum::{
    body::Body,
    http::{header, request, response, HeaderMap, Request},
    response::Response,
};

use crate::cookies::{codec, ClientIdentity, CookieStore};
use crate::observability::metrics;

pub mod gate;
pub mod relay;

pub use gate::RootGate;
pub use relay::{ApiRelay, LoginRelay};

/// Hooks a route runs around forwarding.
pub trait RoutePolicy: Send + Sync + std::fmt::Debug {
    /// Answer the request directly instead of proxying or serving it.
    fn should_bypass(&self, _req: &Request<Body>, _identity: &ClientIdentity) -> Option<Response> {
        None
    }

    /// Adjust the outbound request before it is sent upstream.
    fn on_proxy_request(&self, _req: &mut request::Parts, _identity: &ClientIdentity) {}

    /// Adjust the upstream response before it is returned to the client.
    fn on_proxy_response(&self, _res: &mut response::Parts, _identity: &ClientIdentity) {}
}

/// Merge every Set-Cookie in `headers` into the store.
///
/// Returns the number of pairs merged. Malformed values are skipped, and
/// nothing is ever stored for the anonymous identity.
pub(crate) fn capture_set_cookies(
    store: &CookieStore,
    identity: &ClientIdentity,
    headers: &HeaderMap,
    route: &str,
) -> usize {
    if identity.is_anonymous() {
        if headers.contains_key(header::SET_COOKIE) {
            tracing::debug!(route = %route, "No User-Agent, Set-Cookie not captured");
        }
        return 0;
    }

    let raw = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let pairs = codec::parse(raw);
    let captured = pairs.len();
    if captured > 0 {
        tracing::debug!(
            route = %route,
            identity = %identity,
            cookies = captured,
            "Captured Set-Cookie"
        );
        store.merge(identity, pairs);
        metrics::record_cookies_captured(route, captured);
    }
    captured
}
