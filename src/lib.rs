//! Local development server with an SSO cookie relay.
//!
//! Forwards API and login requests to remote origins, keeps a per-browser
//! in-memory cookie jar keyed by User-Agent, rewrites the SSO login redirect
//! and gates the index page behind login.

pub mod config;
pub mod cookies;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod routing;

pub use config::schema::DevServerConfig;
pub use cookies::CookieStore;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
