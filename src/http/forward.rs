//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream origin
//! - Strip hop-by-hop headers, optionally rewrite Host
//! - Run the route's request/response hooks around the upstream call
//! - Map transport failures to 502 Bad Gateway
//!
//! # Design Decisions
//! - Bodies stream through in both directions, nothing is buffered
//! - Upstream requests always go out as HTTP/1.1
//! - No retries; a failed upstream call is reported once

use axum::{
    body::Body,
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};

use crate::config::validation::check_origin;
use crate::cookies::ClientIdentity;
use crate::http::response::strip_hop_by_hop;
use crate::routing::Route;

/// HTTP client used for all upstream calls.
pub type HttpClient = Client<HttpConnector, Body>;

/// A parsed upstream origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
    /// Path prepended to every forwarded path, without trailing slash.
    base_path: String,
}

impl Upstream {
    /// Parse an origin such as `http://api.local:3000` or `http://api.local/base`.
    pub fn from_origin(origin: &str) -> Result<Self, String> {
        let url = check_origin(origin)?;

        // url normalizes away default ports; keep whatever is left.
        let host = url.host_str().ok_or_else(|| "missing host".to_string())?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority = authority
            .parse::<Authority>()
            .map_err(|e| format!("invalid authority {authority:?}: {e}"))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            base_path: url.path().trim_end_matches('/').to_string(),
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Target URI for a request originally addressed to `original`.
    pub fn target_uri(&self, original: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = original
            .path_and_query()
            .map(PathAndQuery::as_str)
            .unwrap_or("/");

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(format!("{}{}", self.base_path, path_and_query))
            .build()
    }
}

/// Forward `request` to `upstream`, running the route's hooks.
pub async fn forward(
    client: &HttpClient,
    route: &Route,
    upstream: &Upstream,
    request: Request<Body>,
    identity: &ClientIdentity,
) -> Response {
    let (mut parts, body) = request.into_parts();

    parts.uri = match upstream.target_uri(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(route = %route.name, error = %e, "Failed to build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request target").into_response();
        }
    };
    parts.version = Version::HTTP_11;

    strip_hop_by_hop(&mut parts.headers);
    if route.change_origin {
        if let Ok(host) = HeaderValue::from_str(upstream.authority().as_str()) {
            parts.headers.insert(header::HOST, host);
        }
    }

    route.policy.on_proxy_request(&mut parts, identity);

    tracing::debug!(route = %route.name, uri = %parts.uri, "Forwarding upstream");

    match client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (mut parts, body) = response.into_parts();
            strip_hop_by_hop(&mut parts.headers);
            route.policy.on_proxy_response(&mut parts, identity);
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(
                route = %route.name,
                upstream = %upstream.authority(),
                error = %e,
                "Upstream error"
            );
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin() {
        let up = Upstream::from_origin("http://127.0.0.1:3000").unwrap();
        assert_eq!(up.authority().as_str(), "127.0.0.1:3000");

        let up = Upstream::from_origin("http://www.sso.com").unwrap();
        assert_eq!(up.authority().as_str(), "www.sso.com");

        let up = Upstream::from_origin("http://www.sso.com:80/").unwrap();
        assert_eq!(up.authority().as_str(), "www.sso.com");

        assert!(Upstream::from_origin("https://www.sso.com").is_err());
    }

    #[test]
    fn test_target_uri() {
        let up = Upstream::from_origin("http://api.local:3000").unwrap();
        let original: Uri = "/api/users?page=2".parse().unwrap();
        assert_eq!(
            up.target_uri(&original).unwrap(),
            "http://api.local:3000/api/users?page=2"
        );
    }

    #[test]
    fn test_target_uri_with_base_path() {
        let up = Upstream::from_origin("http://api.local/v1/").unwrap();
        let original: Uri = "/api/users".parse().unwrap();
        assert_eq!(up.target_uri(&original).unwrap(), "http://api.local/v1/api/users");
    }

    #[test]
    fn test_target_uri_from_absolute_form() {
        let up = Upstream::from_origin("http://sso.local").unwrap();
        let original: Uri = "http://localhost:8080/login?service=x".parse().unwrap();
        assert_eq!(
            up.target_uri(&original).unwrap(),
            "http://sso.local/login?service=x"
        );
    }
}
