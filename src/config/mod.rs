//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DevServerConfig (validated, immutable)
//!     → consumed once at startup by the router and server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults so an empty file is a working config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{
    AuthConfig, DevServerConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig,
    RoutePolicyKind, RouteTable, StaticConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
