//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build route table → Bind listener → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT (signals.rs)
//!     → Shutdown coordinator (shutdown.rs)
//!     → Server drains in-flight requests and exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then the table, listener last
//! - Any startup error is fatal; nothing serves from a partial state
//! - Shutdown is broadcast so every long-running task observes it

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
