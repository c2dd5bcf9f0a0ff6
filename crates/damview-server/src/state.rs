//! Shared application state.

use anyhow::Context;
use damview_core::ServerConfig;
use std::sync::Arc;
use std::time::Duration;

/// Immutable state shared by every handler.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    /// Pooled client for upstream and token-endpoint calls
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            // Upstream redirects are returned to the caller, not followed
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create upstream HTTP client")?;

        Ok(Arc::new(Self { config, http }))
    }
}
