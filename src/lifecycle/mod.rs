//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build server → Bind listener → Open browser
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Browser launch failures are logged, never fatal
//! - Cookie store is dropped with the process; nothing to flush

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
