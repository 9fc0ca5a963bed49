//! HTTP report sink - POSTs the final result to the evaluator endpoint.
//!
//! One shared client with a fixed 10-second ceiling. Delivery failures are
//! returned to the caller, never retried here.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;

use crate::ports::{FinalReport, ReportError, ReportSink};

/// Evaluator callback sink over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpReportSink {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpReportSink {
    /// Creates a sink targeting the given evaluator URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Network(format!("HTTP client init failed: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn deliver(&self, report: &FinalReport) -> Result<(), ReportError> {
        let response = self
            .client
            .post(&self.url)
            .json(report)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReportError::Timeout {
                        timeout_secs: self.timeout.as_secs() as u32,
                    }
                } else {
                    ReportError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 200 {
            tracing::info!(session_id = %report.session_id, "final report delivered");
            Ok(())
        } else {
            tracing::warn!(
                session_id = %report.session_id,
                status = status.as_u16(),
                "evaluator rejected final report"
            );
            Err(ReportError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Recording sink for tests: stores every delivered report instead of
/// sending it anywhere.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<FinalReport>>,
    fail_next: Mutex<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next delivery fail with a 503 rejection.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    /// Reports delivered so far.
    pub fn delivered(&self) -> Vec<FinalReport> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn deliver(&self, report: &FinalReport) -> Result<(), ReportError> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(ReportError::Rejected { status: 503 });
        }
        self.delivered.lock().unwrap().push(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_construction_succeeds() {
        let sink = HttpReportSink::new("https://evaluator.example/final", Duration::from_secs(10));
        assert!(sink.is_ok());
    }
}
