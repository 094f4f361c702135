//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, client identity)
//!     → [routing layer picks a rule, policy may bypass]
//!     → forward.rs (rewrite URI/headers, run hooks, send upstream)
//!       or static_files.rs (build output, index page)
//!     → response.rs (hop-by-hop stripping, redirects)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use forward::Upstream;
pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
pub use static_files::StaticFiles;
