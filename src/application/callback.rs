//! Final-result callback orchestration.
//!
//! The policy decides when a session is worth reporting; this service owns
//! the report-once guard. A session is reported at most once: the guard is
//! checked before delivery and `Session::reported` is set only after the
//! evaluator acknowledged, so a failed delivery is retried on the next turn.

use std::sync::Arc;

use crate::application::SessionStore;
use crate::domain::Session;
use crate::ports::{
    CallbackPolicy, ErrorClass, FinalReport, MetricsSink, ReportError, ReportSink,
};

pub struct CallbackService {
    sink: Arc<dyn ReportSink>,
    policy: Arc<dyn CallbackPolicy>,
    sessions: Arc<SessionStore>,
    metrics: Arc<dyn MetricsSink>,
}

impl CallbackService {
    pub fn new(
        sink: Arc<dyn ReportSink>,
        policy: Arc<dyn CallbackPolicy>,
        sessions: Arc<SessionStore>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            sink,
            policy,
            sessions,
            metrics,
        }
    }

    async fn deliver_and_mark(&self, session: &Session) -> Result<(), ReportError> {
        let report = FinalReport::from_session(session);
        tracing::info!(
            session_id = %session.session_id,
            scam_detected = report.scam_detected,
            messages = report.total_messages_exchanged,
            artifacts = report.extracted_intelligence.artifact_count(),
            "sending final report"
        );
        self.sink.deliver(&report).await?;

        // The flag write is best-effort; a store hiccup here means one
        // possible duplicate report, never a lost one.
        if let Err(err) = self.sessions.mark_reported(&session.session_id).await {
            tracing::error!(session_id = %session.session_id, %err, "failed to persist reported flag");
            self.metrics.record_error(ErrorClass::Store);
        }
        Ok(())
    }

    /// Reports the session if the policy fires and it was not reported yet.
    ///
    /// Returns whether a report was delivered on this call.
    pub async fn maybe_report(&self, session: &Session) -> bool {
        if session.reported {
            tracing::debug!(session_id = %session.session_id, "already reported, suppressing");
            return false;
        }
        if !self.policy.should_report(session) {
            return false;
        }
        tracing::info!(
            session_id = %session.session_id,
            policy = self.policy.name(),
            "callback policy fired"
        );

        match self.deliver_and_mark(session).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(session_id = %session.session_id, %err, "report delivery failed");
                self.metrics.record_error(ErrorClass::Other);
                false
            }
        }
    }

    /// Delivers the report unconditionally. Operator-triggered finalize.
    pub async fn force_report(&self, session: &Session) -> Result<(), ReportError> {
        self.deliver_and_mark(session).await
    }
}

impl std::fmt::Debug for CallbackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackService")
            .field("policy", &self.policy.name())
            .finish_non_exhaustive()
    }
}
