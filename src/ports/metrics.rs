//! Metrics Sink Port - fire-and-forget observers.
//!
//! The core calls these as side effects; aggregation and exposure are the
//! adapter's concern. Every method has a no-op default so test doubles only
//! override what they assert on.

use std::sync::Arc;

/// Intelligence category labels used in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntelCategory {
    UpiIds,
    BankAccounts,
    PhoneNumbers,
    PhishingLinks,
    Keywords,
}

impl IntelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntelCategory::UpiIds => "upiIds",
            IntelCategory::BankAccounts => "bankAccounts",
            IntelCategory::PhoneNumbers => "phoneNumbers",
            IntelCategory::PhishingLinks => "phishingLinks",
            IntelCategory::Keywords => "keywords",
        }
    }
}

/// Error classes tracked by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Provider,
    Store,
    Other,
}

/// Port for recording operational metrics.
pub trait MetricsSink: Send + Sync {
    fn record_request(&self) {}
    fn record_response_time(&self, _secs: f64) {}
    fn record_scam_detection(&self, _is_scam: bool) {}
    fn record_intelligence(&self, _category: IntelCategory, _count: usize) {}
    fn record_cache_hit(&self) {}
    fn record_cache_miss(&self) {}
    fn record_session_duration(&self, _secs: u64) {}
    fn record_error(&self, _class: ErrorClass) {}
}

/// No-op sink for tests and wiring without a collector.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsSink for NoOpMetrics {}

/// Convenience constructor for a shared no-op sink.
pub fn noop() -> Arc<dyn MetricsSink> {
    Arc::new(NoOpMetrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_accepts_all_calls() {
        let sink = NoOpMetrics;
        sink.record_request();
        sink.record_cache_hit();
        sink.record_cache_miss();
        sink.record_scam_detection(true);
        sink.record_intelligence(IntelCategory::UpiIds, 2);
        sink.record_error(ErrorClass::Provider);
    }

    #[test]
    fn category_labels_match_wire_names() {
        assert_eq!(IntelCategory::UpiIds.as_str(), "upiIds");
        assert_eq!(IntelCategory::Keywords.as_str(), "keywords");
    }
}
