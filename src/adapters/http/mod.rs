//! HTTP adapter - the platform-facing REST surface.
//!
//! The honeypot endpoints live in their own module; middleware carries the
//! cross-cutting concerns (API-key auth, request timing).

pub mod honeypot;
pub mod middleware;

// Re-export key types for convenience
pub use honeypot::honeypot_routes;
pub use honeypot::HoneypotHandlers;

use axum::middleware::from_fn_with_state;
use axum::Router;
use secrecy::Secret;
use tower_http::trace::TraceLayer;

use middleware::{api_key_middleware, timing_middleware, ApiKeyState};

/// Assembles the full router: routes plus auth, timing and trace layers.
///
/// CORS and the request timeout are deployment concerns layered on by the
/// binary; tests exercise this router directly.
pub fn app_router(handlers: HoneypotHandlers, api_key: Option<Secret<String>>) -> Router {
    let metrics = handlers.metrics();
    honeypot_routes(handlers)
        .layer(from_fn_with_state(ApiKeyState::new(api_key), api_key_middleware))
        .layer(from_fn_with_state(metrics, timing_middleware))
        .layer(TraceLayer::new_for_http())
}
