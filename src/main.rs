//! Delegated-authorization access-token API service.
//!
//! Serves the OS-OAUTH1 extension of an identity API: inspection and
//! revocation of access tokens a user has delegated to third-party
//! consumers, plus the machine-readable home document describing that
//! surface.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                API SERVICE                    │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────▶│  │  axum   │──▶│ routing  │──▶│ handlers  │  │
//!                      │  │ server  │   │  table   │   │ (actions) │  │
//!                      │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                      │       │              │               │        │
//!                      │       │              ▼               ▼        │
//!                      │       │       ┌──────────┐   ┌───────────┐   │
//!                      │       │       │discovery │   │  backend  │───┼──▶ token store
//!                      │       │       │ document │   │   trait   │   │    (external)
//!                      │       │       └──────────┘   └───────────┘   │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │ config · observability · lifecycle      │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! Startup is fail-fast: a config or route-registration fault aborts the
//! process before the listener is bound.

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use token_delegation::backend::MemoryBackend;
use token_delegation::config::{load_config, ServiceConfig};
use token_delegation::lifecycle::{signals, Shutdown};
use token_delegation::observability::{logging, metrics};
use token_delegation::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file as the only argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        path_prefix = %config.api.path_prefix,
        "token-delegation starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // The process-local backend serves development; a real deployment
    // embeds the library and supplies its own TokenBackend.
    let backend = Arc::new(MemoryBackend::new());

    let server = HttpServer::new(config.clone(), backend)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
