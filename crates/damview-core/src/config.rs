//! Configuration module
//!
//! Typed configuration for the proxy/token server and for the client-side
//! viewer, read from the environment (a `.env` file is honoured when present).

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 3001;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 1_000;
const PAGE_SIZE: u32 = 30;
const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_TOKEN_DIR: &str = ".damview";

/// Proxy and token-exchange server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // OAuth2 client credentials attached to the code exchange
    pub app_id: String,
    pub app_secret: String,
    pub token_url: String,
    // Reverse proxy
    pub upstream_scheme: String,
    /// When set, only tenants equal to or under one of these domains are proxied.
    pub tenant_allowlist: Option<Vec<String>>,
    pub allow_private_upstreams: bool,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = parse_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let config = ServerConfig {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SERVER_PORT),
            environment,
            cors_origins,
            app_id: env::var("APP_ID").unwrap_or_default(),
            app_secret: env::var("APP_SECRET").unwrap_or_default(),
            token_url: env::var("AUTHORIZATION_SERVER_TOKEN_URL").unwrap_or_default(),
            upstream_scheme: env::var("UPSTREAM_SCHEME")
                .unwrap_or_else(|_| "https".to_string())
                .to_lowercase(),
            tenant_allowlist: env::var("TENANT_ALLOWLIST")
                .ok()
                .map(|s| parse_list(&s))
                .filter(|list| !list.is_empty()),
            allow_private_upstreams: env::var("ALLOW_PRIVATE_UPSTREAMS")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.app_id.is_empty() || self.app_secret.is_empty() {
            return Err(anyhow::anyhow!(
                "APP_ID and APP_SECRET must be set for the token exchange"
            ));
        }

        if !self.token_url.starts_with("http://") && !self.token_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "AUTHORIZATION_SERVER_TOKEN_URL must be an http(s) URL"
            ));
        }

        if self.upstream_scheme != "http" && self.upstream_scheme != "https" {
            return Err(anyhow::anyhow!(
                "UPSTREAM_SCHEME must be either http or https, got {}",
                self.upstream_scheme
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

/// Viewer / API client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Origin of the damview server (proxy + token endpoint)
    pub api_url: String,
    /// Application id; also the key the token payload is persisted under
    pub app_id: String,
    pub token_dir: PathBuf,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = ClientConfig {
            api_url: env::var("DAMVIEW_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            app_id: env::var("APP_ID").unwrap_or_default(),
            token_dir: env::var("DAMVIEW_TOKEN_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_DIR)),
            page_size: env::var("DAMVIEW_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(PAGE_SIZE),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.app_id.is_empty() {
            return Err(anyhow::anyhow!("APP_ID must be set"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!("DAMVIEW_API_URL must be an http(s) URL"));
        }
        Ok(())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
