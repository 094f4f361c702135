//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile route configs into matchers, upstreams and policies
//! - Look up the first matching route for a request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (route tables are tiny)
//! - No match means static serving, not an error

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use thiserror::Error;

use crate::config::{DevServerConfig, RouteConfig, RoutePolicyKind};
use crate::cookies::CookieStore;
use crate::http::forward::Upstream;
use crate::policy::{ApiRelay, LoginRelay, RootGate, RoutePolicy};
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Errors raised while compiling the route table.
#[derive(Debug, Error)]
pub enum RouteBuildError {
    #[error("route {route:?}: invalid upstream {origin:?}: {reason}")]
    InvalidUpstream {
        route: String,
        origin: String,
        reason: String,
    },

    #[error("{field}: {value:?} is not a valid header value")]
    InvalidHeaderValue { field: &'static str, value: String },
}

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    /// Route identifier for logging/metrics.
    pub name: String,
    pub matcher: Box<dyn Matcher>,
    /// `None` for routes served locally.
    pub upstream: Option<Upstream>,
    pub change_origin: bool,
    pub policy: Arc<dyn RoutePolicy>,
}

/// Ordered route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Compile the configured routes, wiring every policy to `store`.
    pub fn from_config(config: &DevServerConfig, store: CookieStore) -> Result<Self, RouteBuildError> {
        let login = header_value("auth.login_path", &config.auth.login_path)?;
        let landing = header_value("auth.landing_path", &config.auth.landing_path)?;

        let routes = config
            .routes
            .iter()
            .map(|route| {
                let origin = match route.policy {
                    RoutePolicyKind::Api => Some(config.upstreams.api.as_str()),
                    RoutePolicyKind::Login => Some(config.upstreams.sso.as_str()),
                    RoutePolicyKind::Root => None,
                };
                let policy: Arc<dyn RoutePolicy> = match route.policy {
                    RoutePolicyKind::Api => Arc::new(ApiRelay::new(&route.name, store.clone())),
                    RoutePolicyKind::Login => {
                        Arc::new(LoginRelay::new(&route.name, store.clone(), landing.clone()))
                    }
                    RoutePolicyKind::Root => Arc::new(RootGate::new(store.clone(), login.clone())),
                };
                compile(route, origin, policy)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for route in &routes {
            tracing::debug!(
                route = %route.name,
                matcher = ?route.matcher,
                upstream = ?route.upstream.as_ref().map(|u| u.authority().to_string()),
                "Route compiled"
            );
        }

        Ok(Self::new(routes))
    }

    /// First route matching the request, if any.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Route> {
        self.routes.iter().find(|r| r.matcher.matches(req))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

fn compile(
    route: &RouteConfig,
    origin: Option<&str>,
    policy: Arc<dyn RoutePolicy>,
) -> Result<Route, RouteBuildError> {
    let upstream = origin
        .map(|origin| {
            Upstream::from_origin(origin).map_err(|reason| RouteBuildError::InvalidUpstream {
                route: route.name.clone(),
                origin: origin.to_string(),
                reason,
            })
        })
        .transpose()?;

    Ok(Route {
        name: route.name.clone(),
        matcher: Box::new(PathPrefixMatcher::new(&route.path_prefix)),
        upstream,
        change_origin: route.change_origin,
        policy,
    })
}

fn header_value(field: &'static str, value: &str) -> Result<HeaderValue, RouteBuildError> {
    HeaderValue::from_str(value).map_err(|_| RouteBuildError::InvalidHeaderValue {
        field,
        value: value.to_string(),
    })
}
