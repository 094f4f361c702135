//! Cookie relay policies for proxied routes.

use axum::http::{header, request, response, HeaderValue, StatusCode};

use crate::cookies::{ClientIdentity, CookieStore};
use crate::policy::{capture_set_cookies, RoutePolicy};

/// API passthrough: replays stored cookies and captures new ones.
#[derive(Debug, Clone)]
pub struct ApiRelay {
    route: String,
    store: CookieStore,
}

impl ApiRelay {
    pub fn new(route: impl Into<String>, store: CookieStore) -> Self {
        Self {
            route: route.into(),
            store,
        }
    }
}

impl RoutePolicy for ApiRelay {
    /// Overwrite the `Cookie` header with the identity's stored cookies.
    ///
    /// Whatever the browser sent is dropped; with nothing stored, or no
    /// User-Agent to look it up by, the header is removed entirely.
    fn on_proxy_request(&self, req: &mut request::Parts, identity: &ClientIdentity) {
        let rendered = if identity.is_anonymous() {
            String::new()
        } else {
            self.store.render(identity)
        };
        if rendered.is_empty() {
            req.headers.remove(header::COOKIE);
            return;
        }

        match HeaderValue::from_str(&rendered) {
            Ok(value) => {
                req.headers.insert(header::COOKIE, value);
            }
            Err(e) => {
                tracing::warn!(
                    route = %self.route,
                    identity = %identity,
                    error = %e,
                    "Stored cookies are not a valid header value, sending none"
                );
                req.headers.remove(header::COOKIE);
            }
        }
    }

    fn on_proxy_response(&self, res: &mut response::Parts, identity: &ClientIdentity) {
        capture_set_cookies(&self.store, identity, &res.headers, &self.route);
    }
}

/// SSO login passthrough: captures cookies and sends the browser to the
/// landing page instead of wherever the SSO server redirects.
#[derive(Debug, Clone)]
pub struct LoginRelay {
    route: String,
    store: CookieStore,
    landing: HeaderValue,
}

impl LoginRelay {
    pub fn new(route: impl Into<String>, store: CookieStore, landing: HeaderValue) -> Self {
        Self {
            route: route.into(),
            store,
            landing,
        }
    }
}

impl RoutePolicy for LoginRelay {
    fn on_proxy_response(&self, res: &mut response::Parts, identity: &ClientIdentity) {
        capture_set_cookies(&self.store, identity, &res.headers, &self.route);

        // Only 302; other redirect codes pass through untouched.
        if res.status == StatusCode::FOUND {
            tracing::debug!(
                route = %self.route,
                original = ?res.headers.get(header::LOCATION),
                landing = ?self.landing,
                "Rewriting login redirect"
            );
            res.headers.insert(header::LOCATION, self.landing.clone());
        }
    }
}
