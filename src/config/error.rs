//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("No completion-service credentials configured")]
    NoCredentialsConfigured,

    #[error("Invalid callback URL format")]
    InvalidCallbackUrl,

    #[error("Cache capacity must be positive")]
    InvalidCacheCapacity,

    #[error("Callback thresholds must be positive")]
    InvalidCallbackThresholds,
}
