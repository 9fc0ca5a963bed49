//! Two-pass intelligence extraction.
//!
//! The pattern pass is deterministic regex matching with domain filters and
//! always runs. The generative pass asks the completion service for a
//! structured JSON extraction and degrades to empty output when the service
//! is down. Results are merged per category and annotated with provenance
//! confidence; the merged pair is cached by message fingerprint so replayed
//! scam scripts skip the provider round-trip.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::adapters::ai::CredentialRotator;
use crate::adapters::cache::{fingerprint, BoundedCache};
use crate::domain::{merge_passes, AnnotatedIntelligence, IntelligenceSet};
use crate::ports::{AiError, CompletionRequest, MessageRole};
use serde::{Deserialize, Serialize};

static UPI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.-]+@[\w.-]+\b").expect("upi pattern"));
static ACCOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{9,18}\b").expect("account pattern"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d{10,13}\b").expect("phone pattern"));
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://[^\s]+|bit\.ly/[^\s]+|tinyurl\.com/[^\s]+").expect("url pattern")
});
static IFSC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{4}0[A-Z0-9]{6}\b").expect("ifsc pattern"));

/// UPI handles are only kept when the part after `@` names a known provider
/// (or the bare `upi` suffix); anything else is indistinguishable from an
/// email address.
const UPI_PROVIDERS: &[&str] = &[
    "paytm", "phonepe", "googlepay", "ybl", "oksbi", "okaxis", "okicici", "upi",
];

const SCAM_KEYWORDS: &[&str] = &[
    "urgent", "verify", "blocked", "suspended", "immediately",
    "otp", "prize", "winner", "claim", "congratulations",
    "account", "payment", "transfer", "bank", "upi",
    "kyc", "update", "confirm", "refund", "cashback",
    "lottery", "selected", "won", "free", "offer",
];

const EXTRACTION_SYSTEM_PROMPT: &str =
    "You are an expert at extracting structured information from scam messages. \
     Return only valid JSON.";

fn extraction_prompt(message: &str) -> String {
    format!(
        r#"Analyze the following message and extract any scam-related intelligence.

Message: "{message}"

Extract and return in JSON format:
{{
    "bankAccounts": ["list of bank account numbers found"],
    "upiIds": ["list of UPI IDs found (format: name@provider)"],
    "phishingLinks": ["list of URLs or links found"],
    "phoneNumbers": ["list of phone numbers found"],
    "suspiciousKeywords": ["list of scam-related keywords found"]
}}

Rules:
- Only include actual data found in the message
- UPI IDs must have @ symbol
- Phone numbers should be 10+ digits
- Include all URLs, even shortened ones
- Keywords should be scam-related terms
- Return empty arrays if nothing found
"#
    )
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.iter().any(|v| v == &value) {
        values.push(value);
    }
}

/// Deterministic pattern pass over a single message.
///
/// Filters are domain-specific: UPI handles need a known provider suffix,
/// plain digit runs of 10 or fewer are treated as phone numbers rather than
/// account numbers, and IFSC codes are folded into the account category
/// with an `IFSC:` prefix.
pub fn pattern_pass(message: &str) -> IntelligenceSet {
    let mut intel = IntelligenceSet::default();

    for m in UPI_PATTERN.find_iter(message) {
        let candidate = m.as_str();
        if let Some((_, suffix)) = candidate.rsplit_once('@') {
            let suffix = suffix.to_lowercase();
            if UPI_PROVIDERS.iter().any(|p| suffix.contains(p)) {
                push_unique(&mut intel.upi_ids, candidate.to_string());
            }
        }
    }

    for m in ACCOUNT_PATTERN.find_iter(message) {
        if m.as_str().len() > 10 {
            push_unique(&mut intel.bank_accounts, m.as_str().to_string());
        }
    }

    for m in PHONE_PATTERN.find_iter(message) {
        let digits = m.as_str().replace(['+', '-'], "");
        if digits.len() >= 10 {
            push_unique(&mut intel.phone_numbers, m.as_str().to_string());
        }
    }

    for m in URL_PATTERN.find_iter(message) {
        push_unique(&mut intel.phishing_links, m.as_str().to_string());
    }

    for m in IFSC_PATTERN.find_iter(message) {
        push_unique(&mut intel.bank_accounts, format!("IFSC:{}", m.as_str()));
    }

    let lower = message.to_lowercase();
    for keyword in SCAM_KEYWORDS {
        if lower.contains(keyword) {
            push_unique(&mut intel.suspicious_keywords, keyword.to_string());
        }
    }

    intel
}

/// Both passes for one message, cached together so a replay rebuilds the
/// same provenance annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPasses {
    pattern: IntelligenceSet,
    generative: IntelligenceSet,
}

/// Outcome of a full extraction for one message.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Per-category union of both passes.
    pub merged: IntelligenceSet,
    /// The same union with per-item confidence and provenance.
    pub annotated: AnnotatedIntelligence,
    pub from_cache: bool,
}

/// Two-pass extractor with a fingerprint-keyed result cache.
pub struct IntelExtractor {
    rotator: Arc<CredentialRotator>,
    cache: BoundedCache<CachedPasses>,
}

impl IntelExtractor {
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

    async fn generative_pass(&self, message: &str) -> Result<IntelligenceSet, AiError> {
        let provider = self.rotator.next().ok_or(AiError::NoCredentials)?;
        let request = CompletionRequest::new()
            .with_system_prompt(EXTRACTION_SYSTEM_PROMPT)
            .with_message(MessageRole::User, extraction_prompt(message))
            .with_temperature(0.1)
            .with_max_tokens(500)
            .with_json_output();

        let response = provider.complete(request).await?;
        serde_json::from_str(&response.content).map_err(|e| AiError::parse(e.to_string()))
    }

    /// Runs both passes over a scammer message.
    ///
    /// A generative-pass failure degrades to a pattern-only result; degraded
    /// results are not cached so the next occurrence of the same message
    /// retries the provider.
    pub async fn extract(&self, message: &str, turn: u32) -> ExtractionResult {
        let key = fingerprint(message);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("extraction served from cache");
            let annotated = merge_passes(&cached.pattern, &cached.generative, turn);
            return ExtractionResult {
                merged: annotated.to_simple(),
                annotated,
                from_cache: true,
            };
        }

        let pattern = pattern_pass(message);
        let (generative, complete) = match self.generative_pass(message).await {
            Ok(set) => (set, true),
            Err(err) => {
                tracing::warn!(%err, "generative extraction failed, using pattern pass only");
                (IntelligenceSet::default(), false)
            }
        };

        let annotated = merge_passes(&pattern, &generative, turn);
        let merged = annotated.to_simple();
        tracing::info!(
            upi_ids = merged.upi_ids.len(),
            bank_accounts = merged.bank_accounts.len(),
            phone_numbers = merged.phone_numbers.len(),
            phishing_links = merged.phishing_links.len(),
            keywords = merged.suspicious_keywords.len(),
            "extraction complete"
        );

        if complete {
            self.cache.set(key, CachedPasses { pattern, generative });
        }

        ExtractionResult {
            merged,
            annotated,
            from_cache: false,
        }
    }
}

impl std::fmt::Debug for IntelExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntelExtractor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockProvider;
    use crate::domain::ItemSource;
    use crate::ports::{metrics::noop, AiProvider};

    fn extractor_with(provider: MockProvider) -> IntelExtractor {
        let rotator = Arc::new(CredentialRotator::new(vec![
            Arc::new(provider) as Arc<dyn AiProvider>
        ]));
        IntelExtractor::new(rotator, 16, noop())
    }

    fn extractor_without_provider() -> IntelExtractor {
        let rotator = Arc::new(CredentialRotator::new(Vec::new()));
        IntelExtractor::new(rotator, 16, noop())
    }

    #[test]
    fn pattern_pass_finds_upi_with_known_provider() {
        let intel = pattern_pass("send money to victim@paytm right now");
        assert_eq!(intel.upi_ids, vec!["victim@paytm"]);
    }

    #[test]
    fn pattern_pass_accepts_bare_upi_suffix() {
        let intel = pattern_pass(
            "Your account will be blocked. Verify by sending \u{20b9}100 to verify@upi",
        );
        assert_eq!(intel.upi_ids, vec!["verify@upi"]);
    }

    #[test]
    fn pattern_pass_drops_plain_email_addresses() {
        let intel = pattern_pass("contact support@example.com for help");
        assert!(intel.upi_ids.is_empty());
    }

    #[test]
    fn pattern_pass_checks_provider_suffix_not_local_part() {
        let intel = pattern_pass("write to paytm@gmail.com for a refund");
        assert!(intel.upi_ids.is_empty());
    }

    #[test]
    fn pattern_pass_separates_accounts_from_phones_by_length() {
        let intel = pattern_pass("account 123456789012 or call 9876543210");
        assert_eq!(intel.bank_accounts, vec!["123456789012"]);
        assert!(intel.phone_numbers.contains(&"9876543210".to_string()));
    }

    #[test]
    fn pattern_pass_tags_ifsc_codes() {
        let intel = pattern_pass("transfer to IFSC SBIN0001234");
        assert!(intel.bank_accounts.contains(&"IFSC:SBIN0001234".to_string()));
    }

    #[test]
    fn pattern_pass_finds_shortened_urls() {
        let intel = pattern_pass("click bit.ly/claim-now or https://fake-bank.example/verify");
        assert_eq!(intel.phishing_links.len(), 2);
    }

    #[test]
    fn pattern_pass_collects_keywords_once() {
        let intel = pattern_pass("URGENT urgent: verify your account account");
        let urgent = intel
            .suspicious_keywords
            .iter()
            .filter(|k| k.as_str() == "urgent")
            .count();
        assert_eq!(urgent, 1);
        assert!(intel.suspicious_keywords.contains(&"verify".to_string()));
    }

    #[test]
    fn pattern_pass_on_benign_text_is_empty() {
        let intel = pattern_pass("see you at lunch tomorrow");
        assert!(intel.is_empty());
    }

    #[tokio::test]
    async fn both_passes_merge_with_provenance() {
        let provider = MockProvider::new().with_response(
            r#"{"bankAccounts":[],"upiIds":["victim@paytm","hidden@okaxis"],"phishingLinks":[],"phoneNumbers":[],"suspiciousKeywords":[]}"#,
        );
        let extractor = extractor_with(provider);

        let result = extractor.extract("pay victim@paytm today", 2).await;
        assert!(!result.from_cache);
        assert_eq!(result.merged.upi_ids.len(), 2);

        let shared = result
            .annotated
            .upi_ids
            .iter()
            .find(|i| i.value == "victim@paytm")
            .unwrap();
        assert_eq!(shared.source, ItemSource::Both);
        let llm_only = result
            .annotated
            .upi_ids
            .iter()
            .find(|i| i.value == "hidden@okaxis")
            .unwrap();
        assert_eq!(llm_only.source, ItemSource::Generative);
    }

    #[tokio::test]
    async fn second_extraction_of_same_message_hits_cache() {
        let provider = MockProvider::new().with_response(
            r#"{"bankAccounts":[],"upiIds":[],"phishingLinks":[],"phoneNumbers":[],"suspiciousKeywords":["otp"]}"#,
        );
        let extractor = extractor_with(provider);

        let first = extractor.extract("share your otp", 1).await;
        let second = extractor.extract("share your otp", 2).await;

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.merged, second.merged);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_pattern_only() {
        let extractor = extractor_without_provider();

        let result = extractor.extract("send to victim@paytm", 1).await;
        assert!(!result.from_cache);
        assert_eq!(result.merged.upi_ids, vec!["victim@paytm"]);
        assert!(result
            .annotated
            .upi_ids
            .iter()
            .all(|i| i.source == ItemSource::Pattern));
    }

    #[tokio::test]
    async fn degraded_result_is_not_cached() {
        let extractor = extractor_without_provider();
        extractor.extract("send to victim@paytm", 1).await;

        let retry = extractor.extract("send to victim@paytm", 2).await;
        assert!(!retry.from_cache);
    }

    #[tokio::test]
    async fn malformed_provider_json_degrades_gracefully() {
        let provider = MockProvider::new().with_response("not json at all");
        let extractor = extractor_with(provider);

        let result = extractor.extract("call 9876543210 now", 1).await;
        assert!(result.merged.phone_numbers.contains(&"9876543210".to_string()));
    }
}
