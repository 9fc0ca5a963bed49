//! In-memory metrics collector with a JSON summary for the /metrics route.
//!
//! Counters are plain atomics; sampled series (response times, session
//! durations) keep the most recent 1000 entries under a mutex.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::domain::Timestamp;
use crate::ports::{ErrorClass, IntelCategory, MetricsSink};

const MAX_SAMPLES: usize = 1000;

/// Process-local metrics collector.
#[derive(Debug)]
pub struct MetricsCollector {
    started_at: Timestamp,
    requests_total: AtomicU64,
    scam_count: AtomicU64,
    not_scam_count: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    intel_upi: AtomicU64,
    intel_bank: AtomicU64,
    intel_phone: AtomicU64,
    intel_link: AtomicU64,
    intel_keyword: AtomicU64,
    errors_provider: AtomicU64,
    errors_store: AtomicU64,
    errors_other: AtomicU64,
    response_times: Mutex<VecDeque<f64>>,
    session_durations: Mutex<VecDeque<u64>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            started_at: Timestamp::now(),
            requests_total: AtomicU64::new(0),
            scam_count: AtomicU64::new(0),
            not_scam_count: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            intel_upi: AtomicU64::new(0),
            intel_bank: AtomicU64::new(0),
            intel_phone: AtomicU64::new(0),
            intel_link: AtomicU64::new(0),
            intel_keyword: AtomicU64::new(0),
            errors_provider: AtomicU64::new(0),
            errors_store: AtomicU64::new(0),
            errors_other: AtomicU64::new(0),
            response_times: Mutex::new(VecDeque::new()),
            session_durations: Mutex::new(VecDeque::new()),
        }
    }

    fn push_sample<T>(queue: &Mutex<VecDeque<T>>, sample: T) {
        let mut queue = queue.lock().unwrap();
        if queue.len() >= MAX_SAMPLES {
            queue.pop_front();
        }
        queue.push_back(sample);
    }

    /// Snapshot of every counter and derived rate.
    pub fn summary(&self) -> MetricsSummary {
        let uptime = Timestamp::now().secs_since(&self.started_at);
        let requests = self.requests_total.load(Ordering::Relaxed);
        let scam = self.scam_count.load(Ordering::Relaxed);
        let not_scam = self.not_scam_count.load(Ordering::Relaxed);
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);

        let response_times = self.response_times.lock().unwrap();
        let avg_response_ms = if response_times.is_empty() {
            0.0
        } else {
            response_times.iter().sum::<f64>() / response_times.len() as f64 * 1000.0
        };
        let response_samples = response_times.len();
        drop(response_times);

        let durations = self.session_durations.lock().unwrap();
        let avg_session_secs = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<u64>() as f64 / durations.len() as f64
        };
        let duration_samples = durations.len();
        drop(durations);

        let errors_total = self.errors_provider.load(Ordering::Relaxed)
            + self.errors_store.load(Ordering::Relaxed)
            + self.errors_other.load(Ordering::Relaxed);

        MetricsSummary {
            uptime_seconds: uptime,
            requests_total: requests,
            scam_detection: DetectionCounts {
                total: scam + not_scam,
                scam_count: scam,
                not_scam_count: not_scam,
                scam_rate: ratio(scam, scam + not_scam),
            },
            intelligence_extracted: IntelCounts {
                upi_ids: self.intel_upi.load(Ordering::Relaxed),
                bank_accounts: self.intel_bank.load(Ordering::Relaxed),
                phone_numbers: self.intel_phone.load(Ordering::Relaxed),
                phishing_links: self.intel_link.load(Ordering::Relaxed),
                keywords: self.intel_keyword.load(Ordering::Relaxed),
            },
            response_time: ResponseStats {
                average_ms: avg_response_ms,
                samples: response_samples,
            },
            sessions: SessionStats {
                average_duration_seconds: avg_session_secs,
                samples: duration_samples,
            },
            cache: CacheStats {
                hits,
                misses,
                hit_rate: ratio(hits, hits + misses),
            },
            errors: ErrorCounts {
                total: errors_total,
                provider: self.errors_provider.load(Ordering::Relaxed),
                store: self.errors_store.load(Ordering::Relaxed),
                other: self.errors_other.load(Ordering::Relaxed),
                error_rate: ratio(errors_total, requests),
            },
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl MetricsSink for MetricsCollector {
    fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    fn record_response_time(&self, secs: f64) {
        Self::push_sample(&self.response_times, secs);
    }

    fn record_scam_detection(&self, is_scam: bool) {
        if is_scam {
            self.scam_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.not_scam_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_intelligence(&self, category: IntelCategory, count: usize) {
        let counter = match category {
            IntelCategory::UpiIds => &self.intel_upi,
            IntelCategory::BankAccounts => &self.intel_bank,
            IntelCategory::PhoneNumbers => &self.intel_phone,
            IntelCategory::PhishingLinks => &self.intel_link,
            IntelCategory::Keywords => &self.intel_keyword,
        };
        counter.fetch_add(count as u64, Ordering::Relaxed);
    }

    fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_session_duration(&self, secs: u64) {
        Self::push_sample(&self.session_durations, secs);
    }

    fn record_error(&self, class: ErrorClass) {
        let counter = match class {
            ErrorClass::Provider => &self.errors_provider,
            ErrorClass::Store => &self.errors_store,
            ErrorClass::Other => &self.errors_other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Serialized shape of the /metrics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub uptime_seconds: u64,
    pub requests_total: u64,
    pub scam_detection: DetectionCounts,
    pub intelligence_extracted: IntelCounts,
    pub response_time: ResponseStats,
    pub sessions: SessionStats,
    pub cache: CacheStats,
    pub errors: ErrorCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionCounts {
    pub total: u64,
    pub scam_count: u64,
    pub not_scam_count: u64,
    pub scam_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntelCounts {
    #[serde(rename = "upiIds")]
    pub upi_ids: u64,
    #[serde(rename = "bankAccounts")]
    pub bank_accounts: u64,
    #[serde(rename = "phoneNumbers")]
    pub phone_numbers: u64,
    #[serde(rename = "phishingLinks")]
    pub phishing_links: u64,
    pub keywords: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseStats {
    pub average_ms: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub average_duration_seconds: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorCounts {
    pub total: u64,
    pub provider: u64,
    pub store: u64,
    pub other: u64,
    pub error_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let collector = MetricsCollector::new();
        collector.record_request();
        collector.record_request();
        collector.record_scam_detection(true);
        collector.record_scam_detection(false);
        collector.record_intelligence(IntelCategory::UpiIds, 3);
        collector.record_cache_hit();
        collector.record_cache_miss();
        collector.record_error(ErrorClass::Provider);

        let summary = collector.summary();
        assert_eq!(summary.requests_total, 2);
        assert_eq!(summary.scam_detection.scam_count, 1);
        assert_eq!(summary.scam_detection.scam_rate, 0.5);
        assert_eq!(summary.intelligence_extracted.upi_ids, 3);
        assert_eq!(summary.cache.hit_rate, 0.5);
        assert_eq!(summary.errors.provider, 1);
        assert_eq!(summary.errors.error_rate, 0.5);
    }

    #[test]
    fn empty_collector_has_zero_rates() {
        let summary = MetricsCollector::new().summary();
        assert_eq!(summary.scam_detection.scam_rate, 0.0);
        assert_eq!(summary.cache.hit_rate, 0.0);
        assert_eq!(summary.response_time.average_ms, 0.0);
    }

    #[test]
    fn sampled_series_are_bounded() {
        let collector = MetricsCollector::new();
        for i in 0..(MAX_SAMPLES + 50) {
            collector.record_response_time(i as f64);
        }
        assert_eq!(collector.summary().response_time.samples, MAX_SAMPLES);
    }
}
