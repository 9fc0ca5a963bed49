//! Per-turn engagement pipeline.
//!
//! One scammer message in, one decoy reply out. The first turn classifies
//! the conversation and creates the session; every turn extracts
//! intelligence, persists the exchange, and gives the callback policy a
//! chance to fire. Provider failures degrade inside the individual
//! services; only a store outage aborts the turn.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::agent::{analyze_message, behavior_note, DecoyAgent};
use crate::application::callback::CallbackService;
use crate::application::detector::ScamDetector;
use crate::application::extraction::IntelExtractor;
use crate::application::prompts::NON_SCAM_RESPONSE;
use crate::application::SessionStore;
use crate::domain::{Message, Session};
use crate::ports::{ErrorClass, IntelCategory, MetricsSink, StoreError};

/// One turn of scammer input.
#[derive(Debug, Clone)]
pub struct EngageRequest {
    pub session_id: String,
    pub text: String,
    /// Prior transcript as supplied by the platform.
    pub history: Vec<Message>,
    /// Free-form channel metadata (channel, language, locale).
    pub metadata: HashMap<String, String>,
}

/// The decoy's reply for one turn.
#[derive(Debug, Clone)]
pub struct EngageReply {
    pub reply: String,
    pub scam_detected: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EngageError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct EngagementService {
    sessions: Arc<SessionStore>,
    detector: ScamDetector,
    extractor: IntelExtractor,
    agent: DecoyAgent,
    callback: Arc<CallbackService>,
    metrics: Arc<dyn MetricsSink>,
}

impl EngagementService {
    pub fn new(
        sessions: Arc<SessionStore>,
        detector: ScamDetector,
        extractor: IntelExtractor,
        agent: DecoyAgent,
        callback: Arc<CallbackService>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            sessions,
            detector,
            extractor,
            agent,
            callback,
            metrics,
        }
    }

    /// Opens the session on the first turn, classifying the message.
    async fn open_session(&self, request: &EngageRequest) -> Result<Session, StoreError> {
        let verdict = self.detector.detect(&request.text, &request.metadata).await;
        tracing::info!(
            session_id = %request.session_id,
            is_scam = verdict.is_scam,
            confidence = verdict.confidence,
            "first-turn classification"
        );
        self.metrics.record_scam_detection(verdict.is_scam);

        let session = self
            .sessions
            .create(&request.session_id, verdict.is_scam, verdict.scam_type)
            .await?;
        self.sessions
            .append_note(
                &request.session_id,
                &format!("Initial detection: {}", verdict.reasoning),
            )
            .await?;
        Ok(session)
    }

    fn record_intel_metrics(&self, intel: &crate::domain::IntelligenceSet) {
        self.metrics
            .record_intelligence(IntelCategory::UpiIds, intel.upi_ids.len());
        self.metrics
            .record_intelligence(IntelCategory::BankAccounts, intel.bank_accounts.len());
        self.metrics
            .record_intelligence(IntelCategory::PhoneNumbers, intel.phone_numbers.len());
        self.metrics
            .record_intelligence(IntelCategory::PhishingLinks, intel.phishing_links.len());
        self.metrics
            .record_intelligence(IntelCategory::Keywords, intel.suspicious_keywords.len());
    }

    /// Runs one full turn.
    pub async fn engage(&self, request: EngageRequest) -> Result<EngageReply, EngageError> {
        let session_id = request.session_id.clone();

        let session = match self.sessions.get(&session_id).await? {
            Some(session) if !request.history.is_empty() => session,
            // Absent session, or the platform restarted the conversation.
            _ => self.open_session(&request).await?,
        };

        // A turn is one scammer/decoy exchange.
        let turn = request.history.len() as u32 / 2 + 1;

        let extraction = self.extractor.extract(&request.text, turn).await;
        self.sessions
            .merge_intelligence(&session_id, &extraction.merged)
            .await?;
        self.record_intel_metrics(&extraction.merged);

        let reply = if session.scam_detected {
            let analysis = analyze_message(&request.text);
            let language = request
                .metadata
                .get("language")
                .map(String::as_str)
                .unwrap_or("English");

            let reply = self
                .agent
                .reply(
                    &session_id,
                    &request.text,
                    &request.history,
                    session.scam_type,
                    language,
                )
                .await;

            self.sessions
                .append_note(
                    &session_id,
                    &behavior_note(session.scam_type, &analysis, turn),
                )
                .await?;
            reply
        } else {
            tracing::info!(session_id = %session_id, "benign traffic, neutral reply");
            NON_SCAM_RESPONSE.to_string()
        };

        self.sessions
            .append_message(&session_id, Message::from_scammer(&request.text))
            .await?;
        self.sessions
            .append_message(&session_id, Message::from_decoy(&reply))
            .await?;

        if let Some(engagement) = self.sessions.metrics(&session_id).await? {
            self.metrics
                .record_session_duration(engagement.duration_seconds);
        }

        // Re-read so the policy sees this turn's writes.
        match self.sessions.get(&session_id).await {
            Ok(Some(updated)) => {
                self.callback.maybe_report(&updated).await;
            }
            Ok(None) => {}
            Err(err) => {
                // The reply is already generated; a report check failure
                // must not fail the turn.
                tracing::error!(session_id = %session_id, %err, "post-turn session read failed");
                self.metrics.record_error(ErrorClass::Store);
            }
        }

        Ok(EngageReply {
            reply,
            scam_detected: session.scam_detected,
        })
    }
}

impl std::fmt::Debug for EngagementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngagementService").finish_non_exhaustive()
    }
}
