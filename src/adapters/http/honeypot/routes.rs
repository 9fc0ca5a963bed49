//! HTTP routes for the honeypot endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::handlers::{finalize_session, health, honeypot, metrics_summary, HoneypotHandlers};

/// Creates the honeypot router with all endpoints.
pub fn honeypot_routes(handlers: HoneypotHandlers) -> Router {
    Router::new()
        .route("/api/honeypot", post(honeypot))
        .route("/api/finalize-session/:session_id", post(finalize_session))
        .route("/health", get(health))
        .route("/metrics", get(metrics_summary))
        .with_state(handlers)
}

/// CORS layer from the configured origin list.
///
/// An empty list means the platform proxies from unknown hosts, so every
/// origin is allowed, matching the deployment this service replaces.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
