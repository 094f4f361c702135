//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route or NoMatch (static serving)
//!
//! Route Compilation (at startup):
//!     RouteConfig[] + upstream origins + CookieStore
//!     → Compile matchers and policies
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins, in config order

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, PathPrefixMatcher};
pub use router::{Route, RouteBuildError, Router};
