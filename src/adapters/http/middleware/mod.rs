//! HTTP middleware for axum.
//!
//! - `auth` - API-key check for the /api routes
//! - `timing` - request counting and response-time sampling

pub mod auth;
pub mod timing;

pub use auth::{api_key_middleware, ApiKeyState};
pub use timing::timing_middleware;
