//! API-key middleware.
//!
//! The platform authenticates with a shared key in the `x-api-key` header.
//! Health and metrics probes stay open so load balancers and dashboards do
//! not need the key. With no key configured (development), every request
//! passes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};

use crate::adapters::http::honeypot::ErrorResponse;

/// Paths served without authentication.
const OPEN_PATHS: &[&str] = &["/health", "/metrics"];

/// Auth middleware state - the configured shared key, if any.
#[derive(Clone)]
pub struct ApiKeyState {
    key: Option<Secret<String>>,
}

impl ApiKeyState {
    pub fn new(key: Option<Secret<String>>) -> Self {
        Self { key }
    }
}

/// Middleware validating the `x-api-key` header on protected routes.
pub async fn api_key_middleware(
    State(state): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    if OPEN_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }
    let Some(expected) = state.key.as_ref() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|h| h.to_str().ok());

    match presented {
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("API key is required")),
        )
            .into_response(),
        Some(key) if key == expected.expose_secret() => next.run(request).await,
        Some(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid API key")),
        )
            .into_response(),
    }
}
