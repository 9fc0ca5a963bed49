//! Evaluator callback configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Evaluator callback configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    /// Endpoint the final report is POSTed to
    #[serde(default = "default_url")]
    pub url: String,

    /// Delivery timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Which reporting policy to run
    #[serde(default)]
    pub policy: PolicyKind,

    /// Report at this many exchanged messages (threshold policy)
    #[serde(default = "default_report_after_messages")]
    pub report_after_messages: u32,

    /// Hard ceiling on conversation length (threshold policy)
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Minimum non-keyword artifacts for an early report (threshold policy)
    #[serde(default = "default_min_artifacts")]
    pub min_artifacts: usize,

    /// Minimum messages before artifact count alone triggers (threshold policy)
    #[serde(default = "default_min_messages_for_artifacts")]
    pub min_messages_for_artifacts: u32,
}

/// Selectable reporting policy
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Report as soon as a scam is detected
    #[default]
    OnDetection,
    /// Report once engagement or intelligence thresholds are met
    Threshold,
}

impl CallbackConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate callback configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("CALLBACK_URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidCallbackUrl);
        }
        if self.policy == PolicyKind::Threshold
            && (self.report_after_messages == 0 || self.max_turns == 0)
        {
            return Err(ValidationError::InvalidCallbackThresholds);
        }
        Ok(())
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            policy: PolicyKind::default(),
            report_after_messages: default_report_after_messages(),
            max_turns: default_max_turns(),
            min_artifacts: default_min_artifacts(),
            min_messages_for_artifacts: default_min_messages_for_artifacts(),
        }
    }
}

fn default_url() -> String {
    "https://hackathon.guvi.in/api/updateHoneyPotFinalResult".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_report_after_messages() -> u32 {
    15
}

fn default_max_turns() -> u32 {
    50
}

fn default_min_artifacts() -> usize {
    3
}

fn default_min_messages_for_artifacts() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_config_defaults() {
        let config = CallbackConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.policy, PolicyKind::OnDetection);
        assert_eq!(config.report_after_messages, 15);
        assert_eq!(config.max_turns, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_kind_deserializes_snake_case() {
        let kind: PolicyKind = serde_json::from_str("\"threshold\"").unwrap();
        assert_eq!(kind, PolicyKind::Threshold);
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = CallbackConfig {
            url: "ftp://evaluator.example".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_thresholds() {
        let config = CallbackConfig {
            policy: PolicyKind::Threshold,
            report_after_messages: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
