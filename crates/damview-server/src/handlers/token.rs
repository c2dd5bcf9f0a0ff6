//! OAuth2 authorization-code exchange.
//!
//! The browser never sees the application secret: it hands the code to this
//! route, which calls the authorization server with the credentials attached.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use damview_core::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub code: Option<String>,
}

/// `GET /token?code=...`
///
/// A 2xx JSON answer is returned as-is with 200; any other upstream status is
/// passed through with its body.
pub async fn exchange_code(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TokenQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Response, HttpAppError> {
    let Query(query) = query?;
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing code query parameter".to_string()))?;

    let config = &state.config;
    tracing::info!(token_url = %config.token_url, "Exchanging authorization code");

    let upstream = state
        .http
        .post(&config.token_url)
        .query(&[
            ("app_id", config.app_id.as_str()),
            ("app_secret", config.app_secret.as_str()),
            ("code", code.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Network(format!("Token endpoint unreachable: {}", e)))?;

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let body = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read token response: {}", e)))?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Token endpoint rejected the code");
        let status =
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut response = (status, body).into_response();
        if let Some(content_type) = content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        return Ok(response);
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        AppError::Network(format!("Token endpoint returned invalid JSON: {}", e))
    })?;
    tracing::debug!("Authorization code exchanged");

    Ok((StatusCode::OK, Json(payload)).into_response())
}
