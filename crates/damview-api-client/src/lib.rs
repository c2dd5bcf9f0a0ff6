//! HTTP client for the Asset Service.
//!
//! Requests go to the local proxy, which forwards `/api/*` to the tenant host
//! named by the `tenant` query parameter. Every Asset Service call therefore
//! carries both `tenant={tenant}` and `Authorization: Bearer {access_token}`.
//! Domain methods and the [`AssetService`](damview_core::AssetService)
//! implementation live in [`api`].

pub mod api;

use anyhow::Context;
use damview_core::models::TokenData;
use damview_core::{AppError, AppResult, ClientConfig};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Asset Service API prefix on the proxy.
pub const API_PREFIX: &str = "/api/v1";

const DEFAULT_PAGE_SIZE: u32 = 30;

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Ok(Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?
        .with_page_size(config.page_size))
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder, token: &TokenData) -> RequestBuilder {
        request
            .bearer_auth(&token.access_token)
            .query(&[("tenant", token.tenant.as_str())])
    }

    /// Authenticated GET against the proxy. Deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &TokenData,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.build_url(path);
        let mut request = self.authorize(self.client.get(&url), token);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = send(request, &url).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to parse response from {}: {}", url, e)))
    }

    /// Unauthenticated GET, used for the token exchange.
    pub async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = send(request, &url).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to parse response from {}: {}", url, e)))
    }

    /// GET returning the raw body and its content type.
    ///
    /// URLs under the proxy are authorized like any other call; foreign URLs
    /// (e.g. a CDN) are fetched as-is.
    pub async fn get_bytes(&self, url: &str, token: &TokenData) -> AppResult<(Vec<u8>, String)> {
        let target = if url.starts_with('/') {
            self.build_url(url)
        } else {
            url.to_string()
        };
        let mut request = self.client.get(&target);
        if self.is_same_origin(&target) {
            request = self.authorize(request, token);
        }

        let response = send(request, &target).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read body from {}: {}", target, e)))?;
        Ok((bytes.to_vec(), content_type))
    }

    /// Whether `target` has the scheme, host and port of the base URL.
    fn is_same_origin(&self, target: &str) -> bool {
        match (Url::parse(&self.base_url), Url::parse(target)) {
            (Ok(base), Ok(target)) => base.origin() == target.origin(),
            _ => false,
        }
    }
}

/// Send a request, mapping transport failures to `Network` and non-2xx
/// answers to `Upstream` with the response body.
async fn send(request: RequestBuilder, url: &str) -> AppResult<Response> {
    let response = request.send().await.map_err(|e| {
        tracing::debug!(url = %url, error = %e, "Request failed");
        AppError::Network(format!("Failed to send request to {}: {}", url, e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!(url = %url, status = status.as_u16(), "Upstream returned an error");
        return Err(AppError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

pub use api::SearchResponse;
