//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `HONEYTRAP` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use honeytrap::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod callback;
mod error;
mod redis;
mod server;

pub use ai::AiConfig;
pub use callback::{CallbackConfig, PolicyKind};
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, API key)
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration (session store)
    pub redis: RedisConfig,

    /// Completion-service configuration (credentials, model, caches)
    #[serde(default)]
    pub ai: AiConfig,

    /// Evaluator callback configuration
    #[serde(default)]
    pub callback: CallbackConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HONEYTRAP` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HONEYTRAP__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `HONEYTRAP__REDIS__URL=...` -> `redis.url = ...`
    /// - `HONEYTRAP__AI__GROQ_API_KEYS=k1,k2` -> `ai.groq_api_keys = "k1,k2"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are missing
    /// or values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HONEYTRAP")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.redis.validate()?;
        self.ai.validate()?;
        self.callback.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("HONEYTRAP__REDIS__URL", "redis://localhost:6379");
        env::set_var("HONEYTRAP__AI__GROQ_API_KEYS", "gsk_one,gsk_two");
    }

    fn clear_env() {
        env::remove_var("HONEYTRAP__REDIS__URL");
        env::remove_var("HONEYTRAP__AI__GROQ_API_KEYS");
        env::remove_var("HONEYTRAP__SERVER__PORT");
        env::remove_var("HONEYTRAP__SERVER__ENVIRONMENT");
        env::remove_var("HONEYTRAP__CALLBACK__POLICY");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert_eq!(config.ai.api_keys(), vec!["gsk_one", "gsk_two"]);
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.callback.policy, PolicyKind::OnDetection);
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("HONEYTRAP__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_policy_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("HONEYTRAP__CALLBACK__POLICY", "threshold");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.callback.policy, PolicyKind::Threshold);
    }
}
