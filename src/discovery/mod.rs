//! API discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Route declarations carry relation strings
//!     → relation.rs (pure construction of namespaced relation URIs)
//!     → table registration stores them verbatim
//!
//! Discovery document (at startup):
//!     RouteTable
//!     → document.rs (one entry per resource, keyed by relation)
//!     → rendered once, served byte-identical for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Relations are identifiers, not fetchable URLs; the base is a constant
//!   so documents never depend on deployment configuration
//! - Ordered maps everywhere, so serialization is reproducible
//! - Document generation is derived from the table; routes and discovery
//!   metadata cannot drift apart

pub mod document;
pub mod relation;

pub use document::{HomeDocument, ResourceDescriptor};
pub use relation::{Parameters, RelationBuilder};
