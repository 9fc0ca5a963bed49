//! Report Sink Port - Final-result delivery to the external evaluator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{IntelligenceSet, Session};

/// Final summary POSTed to the evaluator. Field names are fixed by the
/// evaluator protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "scamDetected")]
    pub scam_detected: bool,
    #[serde(rename = "totalMessagesExchanged")]
    pub total_messages_exchanged: u32,
    #[serde(rename = "extractedIntelligence")]
    pub extracted_intelligence: IntelligenceSet,
    /// Notes joined with `" | "`, or `"No additional notes"` when empty.
    #[serde(rename = "agentNotes")]
    pub agent_notes: String,
}

impl FinalReport {
    /// Builds the report payload from a session record.
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            scam_detected: session.scam_detected,
            total_messages_exchanged: session.message_count,
            extracted_intelligence: session.intelligence.clone(),
            agent_notes: session.joined_notes(),
        }
    }
}

/// Port for delivering the final report.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Delivers the report. Success means the evaluator acknowledged with
    /// HTTP 200; everything else is an error the caller logs but does not
    /// retry.
    async fn deliver(&self, report: &FinalReport) -> Result<(), ReportError>;
}

/// Report delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("evaluator rejected report: status {status}")]
    Rejected { status: u16 },

    #[error("report delivery timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("network error: {0}")]
    Network(String),
}
