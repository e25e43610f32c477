//! Delegated-authorization access-token API service library.

pub mod api;
pub mod backend;
pub mod config;
pub mod discovery;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use api::server::HttpServer;
pub use config::schema::ServiceConfig;
pub use lifecycle::Shutdown;
