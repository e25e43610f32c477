//! Shared utilities for integration testing.

use std::sync::Arc;

use time::macros::datetime;
use token_delegation::backend::{AccessToken, DelegatedRole, MemoryBackend};
use token_delegation::config::ServiceConfig;
use token_delegation::lifecycle::Shutdown;
use token_delegation::HttpServer;

/// A running server instance bound to an ephemeral port.
///
/// Holds the shutdown coordinator so the server keeps serving for the
/// lifetime of the test.
pub struct TestServer {
    pub base_url: String,
    _shutdown: Shutdown,
}

/// Start a server over the given backend. The listener is bound before
/// returning, so requests can be issued immediately.
pub async fn start_server(backend: Arc<MemoryBackend>) -> TestServer {
    let config = ServiceConfig::default();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, backend).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer {
        base_url: format!("http://{}", addr),
        _shutdown: shutdown,
    }
}

/// Start a server with the fixtures most tests expect: user `42` holding
/// token `99` (two delegated roles) and token `100` (no roles, no expiry).
pub async fn start_seeded_server() -> TestServer {
    let backend = Arc::new(MemoryBackend::new());
    seed(&backend);
    start_server(backend).await
}

pub fn seed(backend: &MemoryBackend) {
    backend.seed_token(
        "42",
        AccessToken {
            id: "99".to_string(),
            consumer_id: "consumer-7".to_string(),
            project_id: "project-x".to_string(),
            authorizing_user_id: "42".to_string(),
            expires_at: Some(datetime!(2030-01-01 00:00:00 UTC)),
        },
        vec![
            DelegatedRole {
                id: "role-1".to_string(),
                name: "reader".to_string(),
            },
            DelegatedRole {
                id: "role-2".to_string(),
                name: "writer".to_string(),
            },
        ],
    );
    backend.seed_token(
        "42",
        AccessToken {
            id: "100".to_string(),
            consumer_id: "consumer-8".to_string(),
            project_id: "project-x".to_string(),
            authorizing_user_id: "42".to_string(),
            expires_at: None,
        },
        Vec::new(),
    );
}
