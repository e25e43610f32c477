//! Delegated-authorization HTTP surface.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     routes.rs (declare the five resources)
//!     → routing::table (validate, freeze)
//!     → discovery::document (derive home document)
//!     → server.rs (mount under the configured prefix, wire middleware)
//!
//! Request:
//!     axum dispatch → handlers.rs (typed path params)
//!     → backend trait
//!     → JSON envelope, or error.rs envelope on failure
//! ```

pub mod error;
pub mod handlers;
pub mod request_id;
pub mod routes;
pub mod server;

pub use server::{AppState, HttpServer, StartupError};
