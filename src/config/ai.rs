//! Completion-service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion-service configuration
///
/// Multiple credentials are supported (comma-separated) and rotated
/// round-robin to spread per-key rate limits.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Comma-separated API keys
    pub groq_api_keys: Option<Secret<String>>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Capacity of each in-process result cache (detection, extraction)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed credential list, empty entries dropped
    pub fn api_keys(&self) -> Vec<String> {
        self.groq_api_keys
            .as_ref()
            .map(|keys| {
                keys.expose_secret()
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validate completion-service configuration
    ///
    /// An empty credential list is allowed: the engine degrades to its
    /// deterministic fallbacks. A configured-but-blank list is a mistake.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.groq_api_keys.is_some() && self.api_keys().is_empty() {
            return Err(ValidationError::NoCredentialsConfigured);
        }
        if self.cache_capacity == 0 {
            return Err(ValidationError::InvalidCacheCapacity);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            groq_api_keys: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_timeout() -> u64 {
    8
}

fn default_cache_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.timeout_secs, 8);
        assert_eq!(config.cache_capacity, 1000);
        assert!(config.api_keys().is_empty());
    }

    #[test]
    fn test_comma_separated_keys_are_split_and_trimmed() {
        let config = AiConfig {
            groq_api_keys: Some(Secret::new("gsk_a, gsk_b ,, gsk_c".to_string())),
            ..Default::default()
        };
        assert_eq!(config.api_keys(), vec!["gsk_a", "gsk_b", "gsk_c"]);
    }

    #[test]
    fn test_validation_allows_no_credentials() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_credential_list() {
        let config = AiConfig {
            groq_api_keys: Some(Secret::new(" , ,".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_cache_capacity() {
        let config = AiConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
