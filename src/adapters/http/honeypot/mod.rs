//! HTTP adapter for the honeypot endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, FinalizeResponse, HealthResponse, HoneypotRequest, HoneypotResponse,
    WireMessage, WireMetadata,
};
pub use handlers::HoneypotHandlers;
pub use routes::{cors_layer, honeypot_routes};
