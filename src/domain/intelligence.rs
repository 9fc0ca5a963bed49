//! Intelligence records extracted from scammer messages.
//!
//! Two shapes exist side by side. [`IntelligenceSet`] is the plain,
//! deduplicated union that the session record accumulates and the evaluator
//! callback reports. [`AnnotatedIntelligence`] keeps per-item provenance and
//! confidence so the extraction quality can be queried after the fact.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Confidence assigned when both extraction passes agree on a value.
pub const CONFIDENCE_BOTH: f64 = 0.95;
/// Confidence for values only the generative pass produced.
pub const CONFIDENCE_GENERATIVE: f64 = 0.85;
/// Confidence for values only the pattern pass produced.
pub const CONFIDENCE_PATTERN: f64 = 0.75;

/// Which extraction pass produced an intelligence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    /// Deterministic regex rules.
    Pattern,
    /// Completion-service structured output.
    Generative,
    /// Corroborated by both passes.
    Both,
}

/// A single extracted artifact with provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceItem {
    pub value: String,
    /// Confidence in [0, 1], assigned by provenance tier.
    pub confidence: f64,
    pub source: ItemSource,
    pub extracted_at: Timestamp,
    /// Conversation turn the item was extracted on.
    pub turn: u32,
}

/// Deduplicated intelligence grouped by category.
///
/// Wire names are fixed by the evaluator protocol (camelCase).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceSet {
    #[serde(rename = "bankAccounts", default)]
    pub bank_accounts: Vec<String>,
    #[serde(rename = "upiIds", default)]
    pub upi_ids: Vec<String>,
    #[serde(rename = "phishingLinks", default)]
    pub phishing_links: Vec<String>,
    #[serde(rename = "phoneNumbers", default)]
    pub phone_numbers: Vec<String>,
    #[serde(rename = "suspiciousKeywords", default)]
    pub suspicious_keywords: Vec<String>,
}

/// Appends values from `incoming` that are not already present.
///
/// Keeps first-seen order so repeated merges are deterministic.
fn union_into(existing: &mut Vec<String>, incoming: &[String]) {
    for value in incoming {
        if !existing.iter().any(|v| v == value) {
            existing.push(value.clone());
        }
    }
}

impl IntelligenceSet {
    /// Set-unions another intelligence set into this one, per category.
    ///
    /// Idempotent: merging the same set twice leaves the result unchanged.
    pub fn merge(&mut self, incoming: &IntelligenceSet) {
        union_into(&mut self.bank_accounts, &incoming.bank_accounts);
        union_into(&mut self.upi_ids, &incoming.upi_ids);
        union_into(&mut self.phishing_links, &incoming.phishing_links);
        union_into(&mut self.phone_numbers, &incoming.phone_numbers);
        union_into(&mut self.suspicious_keywords, &incoming.suspicious_keywords);
    }

    /// Count of identifying artifacts, excluding keywords.
    ///
    /// Keywords are corroborating signal, not actionable identifiers, so the
    /// callback policy does not count them.
    pub fn artifact_count(&self) -> usize {
        self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phishing_links.len()
            + self.phone_numbers.len()
    }

    /// True when every category is empty.
    pub fn is_empty(&self) -> bool {
        self.artifact_count() == 0 && self.suspicious_keywords.is_empty()
    }
}

/// Intelligence with per-item confidence and provenance, per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedIntelligence {
    pub bank_accounts: Vec<IntelligenceItem>,
    pub upi_ids: Vec<IntelligenceItem>,
    pub phishing_links: Vec<IntelligenceItem>,
    pub phone_numbers: Vec<IntelligenceItem>,
    pub suspicious_keywords: Vec<IntelligenceItem>,
}

impl AnnotatedIntelligence {
    /// Drops every item below the confidence threshold.
    pub fn with_min_confidence(&self, threshold: f64) -> AnnotatedIntelligence {
        let filter = |items: &[IntelligenceItem]| {
            items
                .iter()
                .filter(|i| i.confidence >= threshold)
                .cloned()
                .collect()
        };
        AnnotatedIntelligence {
            bank_accounts: filter(&self.bank_accounts),
            upi_ids: filter(&self.upi_ids),
            phishing_links: filter(&self.phishing_links),
            phone_numbers: filter(&self.phone_numbers),
            suspicious_keywords: filter(&self.suspicious_keywords),
        }
    }

    /// Flattens the annotations back into a plain set.
    pub fn to_simple(&self) -> IntelligenceSet {
        let values = |items: &[IntelligenceItem]| items.iter().map(|i| i.value.clone()).collect();
        IntelligenceSet {
            bank_accounts: values(&self.bank_accounts),
            upi_ids: values(&self.upi_ids),
            phishing_links: values(&self.phishing_links),
            phone_numbers: values(&self.phone_numbers),
            suspicious_keywords: values(&self.suspicious_keywords),
        }
    }

    /// Total item count across categories.
    pub fn len(&self) -> usize {
        self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phishing_links.len()
            + self.phone_numbers.len()
            + self.suspicious_keywords.len()
    }

    /// True when no items were extracted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Annotates one category by provenance overlap between the two passes.
///
/// Values both passes found collapse to a single item tagged [`ItemSource::Both`]
/// at the highest confidence tier; the rest keep their originating pass's tier.
fn annotate_category(
    pattern: &[String],
    generative: &[String],
    extracted_at: Timestamp,
    turn: u32,
) -> Vec<IntelligenceItem> {
    let mut items = Vec::new();
    let item = |value: &str, confidence: f64, source: ItemSource| IntelligenceItem {
        value: value.to_string(),
        confidence,
        source,
        extracted_at,
        turn,
    };

    for value in pattern {
        if generative.iter().any(|v| v == value) {
            items.push(item(value, CONFIDENCE_BOTH, ItemSource::Both));
        } else {
            items.push(item(value, CONFIDENCE_PATTERN, ItemSource::Pattern));
        }
    }
    for value in generative {
        if !pattern.iter().any(|v| v == value) {
            items.push(item(value, CONFIDENCE_GENERATIVE, ItemSource::Generative));
        }
    }

    items
}

/// Merges the pattern and generative passes into an annotated record.
///
/// Per category the result is the set union `P ∪ G`; overlap is tagged
/// `both` at 0.95, pattern-only at 0.75, generative-only at 0.85.
pub fn merge_passes(
    pattern: &IntelligenceSet,
    generative: &IntelligenceSet,
    turn: u32,
) -> AnnotatedIntelligence {
    let now = Timestamp::now();
    AnnotatedIntelligence {
        bank_accounts: annotate_category(
            &pattern.bank_accounts,
            &generative.bank_accounts,
            now,
            turn,
        ),
        upi_ids: annotate_category(&pattern.upi_ids, &generative.upi_ids, now, turn),
        phishing_links: annotate_category(
            &pattern.phishing_links,
            &generative.phishing_links,
            now,
            turn,
        ),
        phone_numbers: annotate_category(
            &pattern.phone_numbers,
            &generative.phone_numbers,
            now,
            turn,
        ),
        suspicious_keywords: annotate_category(
            &pattern.suspicious_keywords,
            &generative.suspicious_keywords,
            now,
            turn,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with_upis(upis: &[&str]) -> IntelligenceSet {
        IntelligenceSet {
            upi_ids: upis.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_unions_without_duplicates() {
        let mut base = set_with_upis(&["first@paytm"]);
        base.merge(&set_with_upis(&["first@paytm", "second@phonepe"]));

        assert_eq!(base.upi_ids, vec!["first@paytm", "second@phonepe"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let incoming = set_with_upis(&["a@ybl", "b@oksbi"]);
        let mut once = IntelligenceSet::default();
        once.merge(&incoming);
        let mut twice = once.clone();
        twice.merge(&incoming);

        assert_eq!(once, twice);
    }

    #[test]
    fn artifact_count_excludes_keywords() {
        let set = IntelligenceSet {
            upi_ids: vec!["a@paytm".into()],
            phone_numbers: vec!["9876543210".into()],
            suspicious_keywords: vec!["urgent".into(), "verify".into()],
            ..Default::default()
        };
        assert_eq!(set.artifact_count(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn merge_passes_assigns_confidence_by_overlap() {
        let pattern = set_with_upis(&["shared@paytm", "pattern@ybl"]);
        let generative = set_with_upis(&["shared@paytm", "llm@okaxis"]);

        let annotated = merge_passes(&pattern, &generative, 3);
        let upis = &annotated.upi_ids;
        assert_eq!(upis.len(), 3);

        let find = |v: &str| upis.iter().find(|i| i.value == v).unwrap();
        let shared = find("shared@paytm");
        assert_eq!(shared.source, ItemSource::Both);
        assert_eq!(shared.confidence, CONFIDENCE_BOTH);

        let pattern_only = find("pattern@ybl");
        assert_eq!(pattern_only.source, ItemSource::Pattern);
        assert_eq!(pattern_only.confidence, CONFIDENCE_PATTERN);

        let llm_only = find("llm@okaxis");
        assert_eq!(llm_only.source, ItemSource::Generative);
        assert_eq!(llm_only.confidence, CONFIDENCE_GENERATIVE);
        assert!(upis.iter().all(|i| i.turn == 3));
    }

    #[test]
    fn merge_passes_union_has_each_value_once() {
        let pattern = set_with_upis(&["a@paytm", "b@paytm"]);
        let generative = set_with_upis(&["b@paytm", "c@paytm"]);

        let annotated = merge_passes(&pattern, &generative, 1);
        let mut values: Vec<_> = annotated.upi_ids.iter().map(|i| i.value.clone()).collect();
        values.sort();
        assert_eq!(values, vec!["a@paytm", "b@paytm", "c@paytm"]);
    }

    #[test]
    fn min_confidence_filters_pattern_only_items() {
        let pattern = set_with_upis(&["only@paytm"]);
        let generative = IntelligenceSet::default();

        let annotated = merge_passes(&pattern, &generative, 1);
        let high = annotated.with_min_confidence(0.8);
        assert!(high.upi_ids.is_empty());

        let all = annotated.with_min_confidence(0.7);
        assert_eq!(all.upi_ids.len(), 1);
    }

    #[test]
    fn to_simple_flattens_values() {
        let pattern = set_with_upis(&["x@paytm"]);
        let annotated = merge_passes(&pattern, &IntelligenceSet::default(), 1);
        assert_eq!(annotated.to_simple().upi_ids, vec!["x@paytm"]);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let set = set_with_upis(&["a@paytm"]);
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("upiIds").is_some());
        assert!(json.get("bankAccounts").is_some());
        assert!(json.get("suspiciousKeywords").is_some());
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    // Distinct values within a pass, matching what the extraction passes emit.
    fn pass_values() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::hash_set("[a-z]{1,6}@(paytm|ybl|okaxis)", 0..6)
            .prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn merged_category_is_exact_union(
            pattern in pass_values(),
            generative in pass_values(),
        ) {
            let p = IntelligenceSet { upi_ids: pattern.clone(), ..Default::default() };
            let g = IntelligenceSet { upi_ids: generative.clone(), ..Default::default() };
            let annotated = merge_passes(&p, &g, 1);

            let mut expected: Vec<String> = pattern;
            for value in generative {
                if !expected.contains(&value) {
                    expected.push(value);
                }
            }
            expected.sort();

            let mut got: Vec<String> =
                annotated.upi_ids.iter().map(|i| i.value.clone()).collect();
            got.sort();

            let mut deduped = got.clone();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), got.len(), "union must hold each value once");
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn merge_is_idempotent_for_any_input(values in pass_values()) {
            let incoming = IntelligenceSet { upi_ids: values, ..Default::default() };
            let mut once = IntelligenceSet::default();
            once.merge(&incoming);
            let mut twice = once.clone();
            twice.merge(&incoming);
            prop_assert_eq!(once, twice);
        }
    }
}
