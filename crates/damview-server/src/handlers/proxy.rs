//! Tenant reverse proxy.
//!
//! `/api/...?tenant=acme.example.com&...` is forwarded to
//! `{scheme}://acme.example.com/api/...?tenant=...&...` with the method,
//! body and end-to-end headers of the incoming request.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::tenant_validation::validate_tenant;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use damview_core::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub tenant: Option<String>,
}

/// Connection-scoped headers that are never forwarded in either direction.
/// `content-length` is recomputed from the forwarded body.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(&name.as_str()) {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

/// Forward any `/api/*` request to the tenant named in the query.
pub async fn forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Result<Query<ProxyQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let Query(query) = query?;
    let config = &state.config;

    let target = validate_tenant(
        query.tenant.as_deref().unwrap_or_default(),
        config.allow_private_upstreams,
        config.tenant_allowlist.as_deref(),
    )
    .await?;

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let url = format!(
        "{}://{}{}",
        config.upstream_scheme,
        target.authority(),
        path_and_query
    );

    tracing::debug!(
        method = %method,
        tenant = %target.host,
        path = %uri.path(),
        "Forwarding request"
    );

    let upstream = state
        .http
        .request(method, &url)
        .headers(end_to_end_headers(&headers))
        .body(body)
        .send()
        .await
        .map_err(|e| {
            AppError::Network(format!("Tenant {} unreachable: {}", target.host, e))
        })?;

    let status = upstream.status();
    let response_headers = end_to_end_headers(upstream.headers());
    let payload = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read tenant response: {}", e)))?;

    if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), tenant = %target.host, "Tenant returned an error");
    } else {
        tracing::debug!(status = status.as_u16(), bytes = payload.len(), "Tenant responded");
    }

    let mut response = (status, payload).into_response();
    response.headers_mut().extend(response_headers);
    Ok(response)
}
