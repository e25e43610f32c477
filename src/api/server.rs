//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the validated route table and derive the home document
//! - Mount the table on an Axum router under the configured prefix
//! - Bind each action to its handler (total match, checked at compile time)
//! - Wire middleware (request ID, tracing, timeout, metrics)
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{error, handlers, request_id, routes};
use crate::backend::TokenBackend;
use crate::config::ServiceConfig;
use crate::discovery::HomeDocument;
use crate::observability::metrics;
use crate::routing::{Action, RouteTable};

/// Faults that abort startup before the listener is bound.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route registration failed: {0}")]
    Registry(#[from] crate::routing::RegistryError),

    #[error("failed to render the home document: {0}")]
    Discovery(#[from] serde_json::Error),
}

/// State shared by all handlers. Everything here is immutable after
/// startup, so it is shared without locks.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn TokenBackend>,
    pub table: Arc<RouteTable>,
    pub prefix: Arc<str>,
    pub home_body: Arc<str>,
}

/// HTTP server for the delegated-authorization API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Build the server. Registration or rendering problems are returned
    /// here so the caller can abort startup.
    pub fn new(
        config: ServiceConfig,
        backend: Arc<dyn TokenBackend>,
    ) -> Result<Self, StartupError> {
        let table = Arc::new(routes::delegation_routes()?);
        tracing::debug!(routes = table.len(), "Route table validated");
        let home = HomeDocument::from_table(&table, &config.api.path_prefix);
        let home_body: Arc<str> = home.render()?.into();

        let state = AppState {
            backend,
            table,
            prefix: config.api.path_prefix.as_str().into(),
            home_body,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Mount the table and wire the middleware stack.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut api = Router::new();
        for entry in state.table.routes() {
            let mut method_router = MethodRouter::new();
            for action in entry.actions() {
                method_router = attach(method_router, action);
            }
            api = api.route(entry.template().as_str(), method_router);
        }

        let root = Router::new().route("/", axum::routing::get(handlers::home_document));
        let root = if config.api.path_prefix.is_empty() {
            root.merge(api)
        } else {
            root.nest(&config.api.path_prefix, api)
        };

        root.fallback(error::not_found)
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(request_id::propagate_request_id_layer())
            .layer(request_id::set_request_id_layer())
    }

    /// Accept connections until the shutdown signal fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.api.path_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Bind an action to its handler and HTTP method.
///
/// The match is total: adding an `Action` variant without a handler is a
/// compile error, which is the point of dispatching on an enum instead of
/// on strings.
fn attach(router: MethodRouter<AppState>, action: Action) -> MethodRouter<AppState> {
    match action {
        Action::ListAccessTokens => router.get(handlers::list_access_tokens),
        Action::GetAccessToken => router.get(handlers::get_access_token),
        Action::DeleteAccessToken => router.delete(handlers::delete_access_token),
        Action::ListAccessTokenRoles => router.get(handlers::list_access_token_roles),
        Action::GetAccessTokenRole => router.get(handlers::get_access_token_role),
    }
}

/// Record one counter increment and one latency observation per request.
///
/// Labelled with the matched route template rather than the raw path to
/// keep metric cardinality bounded; requests that match nothing share the
/// `unmatched` label.
async fn track_requests(
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_string();
    let route = matched_path
        .as_ref()
        .map_or_else(|| "unmatched".to_string(), |m| m.as_str().to_string());

    let response = next.run(request).await;

    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
