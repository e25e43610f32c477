//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declaration (at startup):
//!     ResourceSpec[]
//!     → template.rs (parse path templates)
//!     → table.rs (validate: uniqueness, variable metadata, action slots)
//!     → Freeze as immutable RouteTable
//!
//! Lookup:
//!     (HTTP method, concrete path)
//!     → table.rs resolve()
//!     → Return: matched Action + captured variables, or no match
//! ```
//!
//! # Design Decisions
//! - Table is built once at startup, immutable at runtime
//! - Registration problems abort startup; there is no runtime error surface
//! - Actions are an enum, so every (verb, path) pair binds a handler at
//!   compile time rather than resolving a name at dispatch time
//! - Most-literal template wins when several templates match a path

pub mod table;
pub mod template;

pub use table::{Action, RegistryError, ResourceSpec, RouteEntry, RouteTable, RouteTableBuilder};
pub use template::{PathTemplate, TemplateError};
