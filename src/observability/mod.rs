//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging; the request ID flows through all subsystems
//! - Metrics are cheap (atomic increments) and labelled by route template,
//!   never by raw path, to keep cardinality bounded
//! - The metrics exporter is optional and runs on its own listener

pub mod logging;
pub mod metrics;
