//! Scam detection verdict returned by the first-turn classifier.

use serde::{Deserialize, Serialize};

use super::ScamType;

/// Outcome of classifying the opening message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScamVerdict {
    pub is_scam: bool,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    pub scam_type: ScamType,
    /// Short free-text explanation, stored as the session's initial note.
    pub reasoning: String,
}

impl ScamVerdict {
    /// Verdict for traffic that shows no fraud signals.
    pub fn benign(reasoning: impl Into<String>) -> Self {
        Self {
            is_scam: false,
            confidence: 0.0,
            scam_type: ScamType::Unknown,
            reasoning: reasoning.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benign_verdict_has_unknown_type() {
        let verdict = ScamVerdict::benign("no indicators");
        assert!(!verdict.is_scam);
        assert_eq!(verdict.scam_type, ScamType::Unknown);
    }

    #[test]
    fn verdict_deserializes_from_classifier_json() {
        let json = r#"{"is_scam": true, "confidence": 0.9, "scam_type": "otp_scam", "reasoning": "asks for OTP"}"#;
        let verdict: ScamVerdict = serde_json::from_str(json).unwrap();
        assert!(verdict.is_scam);
        assert_eq!(verdict.scam_type, ScamType::OtpScam);
    }
}
