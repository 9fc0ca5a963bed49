//! First-turn scam classification.
//!
//! The classifier asks the completion service for a structured verdict;
//! when no credential is available or the call fails it falls back to a
//! deterministic keyword scorer, so a conversation is never dropped on the
//! floor because the provider is down. Verdicts from the service are cached
//! by message fingerprint; fallback verdicts are not, so the provider is
//! retried once it recovers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::ai::CredentialRotator;
use crate::adapters::cache::{fingerprint, BoundedCache};
use crate::domain::{ScamType, ScamVerdict};
use crate::ports::{AiError, CompletionRequest, MessageRole};

const DETECTION_SYSTEM_PROMPT: &str =
    "You are an expert at detecting scams and fraudulent messages. \
     Analyze messages carefully and respond in JSON format.";

const FALLBACK_KEYWORDS: &[&str] = &[
    "verify", "blocked", "suspended", "urgent", "otp", "prize", "winner",
    "claim", "payment", "transfer", "account", "kyc", "upi", "bank",
    "refund", "cashback", "won", "lottery", "congratulations",
];

const URL_MARKERS: &[&str] = &["http://", "https://", "bit.ly", "tinyurl"];
const MONEY_MARKERS: &[&str] = &["₹", "rs", "rupees", "send money", "pay"];

fn detection_prompt(message: &str, metadata: &HashMap<String, String>) -> String {
    let mut prompt = format!(
        "Analyze the following message and determine if it's a scam or fraudulent attempt.\n\n\
         Message: \"{message}\"\n"
    );

    if !metadata.is_empty() {
        let field = |key: &str| {
            metadata
                .get(key)
                .map(String::as_str)
                .unwrap_or("Unknown")
                .to_string()
        };
        prompt.push_str(&format!("\nChannel: {}", field("channel")));
        prompt.push_str(&format!("\nLanguage: {}", field("language")));
        prompt.push_str(&format!("\nLocale: {}", field("locale")));
    }

    prompt.push_str(
        r#"

Common scam patterns to detect:
1. Bank account verification/blocking threats
2. UPI payment requests or verification
3. Urgency tactics ("account will be blocked", "immediate action required")
4. Phishing links (shortened URLs, suspicious domains)
5. Prize/lottery scams ("you won", "claim prize")
6. OTP/PIN requests
7. Impersonation (bank, government, delivery services)
8. Payment redirection or fake refunds
9. Fake customer support
10. Investment/crypto scams

Scam indicators:
- Keywords: verify, blocked, suspended, urgent, OTP, prize, winner, claim, payment, transfer, account, KYC
- Requests for: money, UPI ID, bank details, OTP, personal information, passwords
- Suspicious links (bit.ly, tinyurl, or unknown domains)
- Impersonation language (claiming to be from official organizations)
- Threats or time pressure
- Too-good-to-be-true offers

Respond in JSON format with:
{
    "is_scam": true/false,
    "confidence": 0.0-1.0,
    "scam_type": "bank_fraud" | "upi_scam" | "phishing" | "prize_scam" | "otp_scam" | "impersonation" | "payment_scam" | "investment_scam" | "not_scam",
    "reasoning": "brief explanation of why this is/isn't a scam"
}
"#,
    );
    prompt
}

/// Deterministic keyword scorer used when the completion service is
/// unavailable.
///
/// Score is `matches * 0.15 + 0.2 (url) + 0.3 (money request)`, capped at
/// 0.9; anything above 0.5 is classified as a scam.
pub fn fallback_detection(message: &str) -> ScamVerdict {
    let lower = message.to_lowercase();

    let matches = FALLBACK_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .count();
    let has_url = URL_MARKERS.iter().any(|m| lower.contains(m));
    let has_money_request = MONEY_MARKERS.iter().any(|m| lower.contains(m));

    let confidence = (matches as f64 * 0.15
        + if has_url { 0.2 } else { 0.0 }
        + if has_money_request { 0.3 } else { 0.0 })
    .min(0.9);
    let is_scam = confidence > 0.5;

    let scam_type = if !is_scam {
        ScamType::Unknown
    } else if lower.contains("upi") || has_money_request {
        ScamType::UpiScam
    } else if lower.contains("bank") || lower.contains("account") {
        ScamType::BankFraud
    } else if has_url {
        ScamType::Phishing
    } else if lower.contains("prize") || lower.contains("won") {
        ScamType::PrizeScam
    } else if lower.contains("otp") {
        ScamType::OtpScam
    } else {
        ScamType::PaymentScam
    };

    let mut reasoning = format!("Keyword-based detection: {matches} scam indicators found");
    if has_url {
        reasoning.push_str(", suspicious URL detected");
    }
    if has_money_request {
        reasoning.push_str(", money request detected");
    }

    ScamVerdict {
        is_scam,
        confidence,
        scam_type,
        reasoning,
    }
}

/// Scam classifier with a fingerprint-keyed verdict cache.
pub struct ScamDetector {
    rotator: Arc<CredentialRotator>,
    cache: BoundedCache<ScamVerdict>,
}

impl ScamDetector {
    pub fn new(
        rotator: Arc<CredentialRotator>,
        cache_capacity: usize,
        metrics: Arc<dyn crate::ports::MetricsSink>,
    ) -> Self {
        Self {
            rotator,
            cache: BoundedCache::new(cache_capacity, metrics),
        }
    }

    async fn classify(
        &self,
        message: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<ScamVerdict, AiError> {
        let provider = self.rotator.next().ok_or(AiError::NoCredentials)?;
        let request = CompletionRequest::new()
            .with_system_prompt(DETECTION_SYSTEM_PROMPT)
            .with_message(MessageRole::User, detection_prompt(message, metadata))
            .with_temperature(0.3)
            .with_max_tokens(500)
            .with_json_output();

        let response = provider.complete(request).await?;
        serde_json::from_str(&response.content).map_err(|e| AiError::parse(e.to_string()))
    }

    /// Classifies a message, preferring the completion service.
    pub async fn detect(
        &self,
        message: &str,
        metadata: &HashMap<String, String>,
    ) -> ScamVerdict {
        let key = fingerprint(message);
        if let Some(verdict) = self.cache.get(&key) {
            tracing::debug!("detection served from cache");
            return verdict;
        }

        match self.classify(message, metadata).await {
            Ok(verdict) => {
                tracing::info!(
                    is_scam = verdict.is_scam,
                    confidence = verdict.confidence,
                    scam_type = %verdict.scam_type,
                    "scam detection complete"
                );
                self.cache.set(key, verdict.clone());
                verdict
            }
            Err(err) => {
                tracing::warn!(%err, "classifier unavailable, using keyword fallback");
                fallback_detection(message)
            }
        }
    }
}

impl std::fmt::Debug for ScamDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScamDetector").finish_non_exhaustive()
    }
}
