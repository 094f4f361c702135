//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Upstream origins are plain `http` URLs with a host
//! - Paths and route prefixes are absolute
//! - Route names are unique, addresses parse, timeouts are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DevServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::DevServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid upstream origin {value:?}: {reason}")]
    InvalidUpstream {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: path {value:?} must start with '/'")]
    RelativePath { field: String, value: String },

    #[error("routes: duplicate route name {0:?}")]
    DuplicateRoute(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate the whole configuration, collecting every error.
pub fn validate_config(config: &DevServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if let Err(reason) = check_origin(&config.upstreams.api) {
        errors.push(ValidationError::InvalidUpstream {
            field: "upstreams.api",
            value: config.upstreams.api.clone(),
            reason,
        });
    }
    if let Err(reason) = check_origin(&config.upstreams.sso) {
        errors.push(ValidationError::InvalidUpstream {
            field: "upstreams.sso",
            value: config.upstreams.sso.clone(),
            reason,
        });
    }

    check_path("auth.login_path", &config.auth.login_path, &mut errors);
    check_path("auth.landing_path", &config.auth.landing_path, &mut errors);

    let mut names = HashSet::new();
    for route in config.routes.iter() {
        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.name.clone()));
        }
        check_path(
            &format!("routes.{}.path_prefix", route.name),
            &route.path_prefix,
            &mut errors,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `origin` is an `http` URL with a host and no query or fragment.
pub fn check_origin(origin: &str) -> Result<Url, String> {
    let url = Url::parse(origin).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(url)
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_path(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}
