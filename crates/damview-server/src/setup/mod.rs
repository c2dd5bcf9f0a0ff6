//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use damview_core::ServerConfig;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: ServerConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        upstream_scheme = %config.upstream_scheme,
        allowlist = ?config.tenant_allowlist,
        "Configuration loaded and validated successfully"
    );
    if config.allow_private_upstreams {
        tracing::warn!("Private and loopback tenants are allowed - not recommended for production");
    }

    let state = AppState::new(config.clone())?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
