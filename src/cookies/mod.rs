//! Cookie relay subsystem.
//!
//! # Data Flow
//! ```text
//! upstream response (Set-Cookie: sid=abc; Path=/; HttpOnly)
//!     → codec.rs (extract first name=value, drop attributes)
//!     → store.rs (merge into the entry for this client identity)
//!
//! later request from the same client
//!     → identity.rs (User-Agent → ClientIdentity)
//!     → store.rs render (sid=abc;)
//!     → outbound Cookie header
//! ```
//!
//! # Design Decisions
//! - Store is an explicit handle owned by the route policies, never a global
//! - Identity is the raw User-Agent string; clients sharing one collide
//! - Cookie attributes (Path, Domain, Expires, ...) are not modelled
//! - Malformed Set-Cookie values are skipped, never fatal

pub mod codec;
pub mod identity;
pub mod store;

pub use codec::{CookieParseError, CookiePair};
pub use identity::ClientIdentity;
pub use store::{CookieEntry, CookieStore};
