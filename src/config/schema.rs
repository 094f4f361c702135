//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DevServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins the proxied routes forward to.
    pub upstreams: UpstreamConfig,

    /// Login flow paths.
    pub auth: AuthConfig,

    /// Static file serving and browser behaviour.
    pub dev_server: StaticConfig,

    /// Ordered route table. First matching prefix wins.
    pub routes: RouteTable,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Upstream origins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API server origin, target of `RoutePolicyKind::Api` routes.
    pub api: String,

    /// SSO server origin, target of `RoutePolicyKind::Login` routes.
    pub sso: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api: "http://www.your-server.com".to_string(),
            sso: "http://www.sso.com".to_string(),
        }
    }
}

/// Login flow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where anonymous clients are sent from `/`.
    pub login_path: String,

    /// Replaces the SSO server's own redirect target after login.
    pub landing_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            landing_path: "/".to_string(),
        }
    }
}

/// Static serving and startup behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Open the default browser once the listener is bound.
    pub open: bool,

    /// File served for `/`. Empty means `index.html`.
    pub index: String,

    /// Directory holding the frontend build output.
    pub static_dir: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            open: true,
            index: String::new(),
            static_dir: "dist".to_string(),
        }
    }
}

impl StaticConfig {
    /// Index file name with the empty default resolved.
    pub fn index_file(&self) -> &str {
        if self.index.is_empty() {
            "index.html"
        } else {
            &self.index
        }
    }
}

/// Which hooks a route runs and where it forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePolicyKind {
    /// Inject stored cookies, capture Set-Cookie. Forwards to `upstreams.api`.
    Api,
    /// Capture Set-Cookie, rewrite 302 Location. Forwards to `upstreams.sso`.
    Login,
    /// Gate `/` on a stored cookie entry. Not forwarded.
    Root,
}

/// Route configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path prefix to match (case-sensitive).
    pub path_prefix: String,

    /// Hooks and upstream selection.
    pub policy: RoutePolicyKind,

    /// Rewrite the Host header to the upstream authority.
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,
}

fn default_change_origin() -> bool {
    true
}

impl RouteConfig {
    pub fn new(name: &str, path_prefix: &str, policy: RoutePolicyKind) -> Self {
        Self {
            name: name.to_string(),
            path_prefix: path_prefix.to_string(),
            policy,
            change_origin: default_change_origin(),
        }
    }
}

/// Ordered list of routes, defaulting to the api/login/root table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteTable(pub Vec<RouteConfig>);

impl Default for RouteTable {
    fn default() -> Self {
        Self(vec![
            RouteConfig::new("api", "/api", RoutePolicyKind::Api),
            RouteConfig::new("login", "/login", RoutePolicyKind::Login),
            RouteConfig::new("root", "/", RoutePolicyKind::Root),
        ])
    }
}

impl std::ops::Deref for RouteTable {
    type Target = [RouteConfig];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DevServerConfig::default();
        assert_eq!(config.auth.login_path, "/login");
        assert_eq!(config.auth.landing_path, "/");
        assert!(config.dev_server.open);
        assert_eq!(config.dev_server.index_file(), "index.html");

        let prefixes: Vec<_> = config.routes.iter().map(|r| r.path_prefix.as_str()).collect();
        assert_eq!(prefixes, ["/api", "/login", "/"]);
        assert!(config.routes.iter().all(|r| r.change_origin));
    }

    #[test]
    fn test_partial_toml() {
        let config: DevServerConfig = toml::from_str(
            r#"
            [upstreams]
            api = "http://127.0.0.1:3000"

            [dev_server]
            open = false
            index = "app.html"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstreams.api, "http://127.0.0.1:3000");
        assert_eq!(config.upstreams.sso, "http://www.sso.com");
        assert!(!config.dev_server.open);
        assert_eq!(config.dev_server.index_file(), "app.html");
        assert_eq!(config.routes.len(), 3);
    }

    #[test]
    fn test_custom_routes() {
        let config: DevServerConfig = toml::from_str(
            r#"
            [[routes]]
            name = "backend"
            path_prefix = "/service"
            policy = "api"
            change_origin = false

            [[routes]]
            name = "sso"
            path_prefix = "/cas"
            policy = "login"
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].policy, RoutePolicyKind::Api);
        assert!(!config.routes[0].change_origin);
        assert_eq!(config.routes[1].policy, RoutePolicyKind::Login);
        assert!(config.routes[1].change_origin);
    }

    #[test]
    fn test_json_log_format() {
        let config: DevServerConfig = toml::from_str(
            r#"
            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }
}
