//! Callback Policy Port - decides when a session is ready to report.
//!
//! The policy is a pure decision over the current session state. It does not
//! track delivery; the report-once guard lives with the caller (the
//! `CallbackService` checks and sets `Session::reported`).

use crate::domain::Session;

/// Strategy deciding whether a session's final result should be reported.
pub trait CallbackPolicy: Send + Sync {
    fn should_report(&self, session: &Session) -> bool;

    /// Human-readable name for logs and config.
    fn name(&self) -> &'static str;
}

/// Operator-mandated rule: report whenever a scam was detected.
///
/// This fires on every turn of a detected scam, which is why callers must
/// apply the report-once guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOnDetection;

impl CallbackPolicy for ReportOnDetection {
    fn should_report(&self, session: &Session) -> bool {
        session.scam_detected
    }

    fn name(&self) -> &'static str {
        "on_detection"
    }
}

/// Threshold-based rule: report once the conversation has run long enough
/// or yielded enough artifacts.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    /// Report at this many exchanged messages.
    pub report_after_messages: u32,
    /// Hard ceiling on conversation length.
    pub max_turns: u32,
    /// Minimum non-keyword artifacts for an early report.
    pub min_artifacts: usize,
    /// Minimum messages before artifact count alone triggers.
    pub min_messages_for_artifacts: u32,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            report_after_messages: 15,
            max_turns: 50,
            min_artifacts: 3,
            min_messages_for_artifacts: 10,
        }
    }
}

impl CallbackPolicy for ThresholdPolicy {
    fn should_report(&self, session: &Session) -> bool {
        if !session.scam_detected {
            return false;
        }
        if session.message_count >= self.report_after_messages {
            return true;
        }
        if session.message_count >= self.max_turns {
            return true;
        }
        session.intelligence.artifact_count() >= self.min_artifacts
            && session.message_count >= self.min_messages_for_artifacts
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}
