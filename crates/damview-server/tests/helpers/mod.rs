#![allow(dead_code)]

use axum_test::TestServer;
use damview_core::ServerConfig;
use damview_server::setup::routes::setup_routes;
use damview_server::AppState;

pub const APP_ID: &str = "test-app";
pub const APP_SECRET: &str = "test-secret";

/// Config for a server whose tenants and token endpoint are local mock servers.
pub fn test_config(token_url: &str) -> ServerConfig {
    ServerConfig {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        app_id: APP_ID.to_string(),
        app_secret: APP_SECRET.to_string(),
        token_url: token_url.to_string(),
        upstream_scheme: "http".to_string(),
        tenant_allowlist: None,
        allow_private_upstreams: true,
        request_timeout_secs: 5,
        http_concurrency_limit: 16,
    }
}

/// Build the router in-process and wrap it in a test client.
pub fn setup_test_server(config: ServerConfig) -> TestServer {
    let state = AppState::new(config.clone()).expect("Failed to build app state");
    let router = setup_routes(&config, state).expect("Failed to build routes");
    TestServer::new(router).expect("Failed to start test server")
}
