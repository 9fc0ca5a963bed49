//! Session record for one ongoing decoy conversation.
//!
//! A session is keyed by an opaque identifier supplied by the platform that
//! routes scammer traffic to us. The record is a fixed-shape struct (not a
//! loose map) serialized to JSON in the key-value store.

use serde::{Deserialize, Serialize};

use super::{IntelligenceSet, Timestamp};

/// Who authored a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The fraud actor on the other end.
    #[serde(rename = "scammer")]
    Scammer,
    /// Our decoy persona. Wire name "user" is fixed by the platform protocol.
    #[serde(rename = "user", alias = "decoy")]
    Decoy,
}

/// One transcript entry. Ordering is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }

    pub fn from_scammer(text: impl Into<String>) -> Self {
        Self::new(Sender::Scammer, text)
    }

    pub fn from_decoy(text: impl Into<String>) -> Self {
        Self::new(Sender::Decoy, text)
    }
}

/// Classified fraud category for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamType {
    BankFraud,
    UpiScam,
    Phishing,
    PrizeScam,
    OtpScam,
    Impersonation,
    PaymentScam,
    InvestmentScam,
    /// Detector returns "not_scam" for benign traffic; the session keeps
    /// the category as unknown in that case.
    #[serde(alias = "not_scam")]
    #[default]
    Unknown,
}

impl ScamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamType::BankFraud => "bank_fraud",
            ScamType::UpiScam => "upi_scam",
            ScamType::Phishing => "phishing",
            ScamType::PrizeScam => "prize_scam",
            ScamType::OtpScam => "otp_scam",
            ScamType::Impersonation => "impersonation",
            ScamType::PaymentScam => "payment_scam",
            ScamType::InvestmentScam => "investment_scam",
            ScamType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ScamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable state of one decoy conversation.
///
/// Invariants:
/// - `message_count == transcript.len()`
/// - once `scam_detected` is true it is never cleared
/// - once `reported` is true it is never cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub started_at: Timestamp,
    pub scam_detected: bool,
    pub scam_type: ScamType,
    pub transcript: Vec<Message>,
    pub intelligence: IntelligenceSet,
    pub message_count: u32,
    pub agent_notes: Vec<String>,
    /// Set after the final report was delivered; guards re-reporting.
    #[serde(default)]
    pub reported: bool,
}

impl Session {
    /// Creates a fresh session with an empty transcript.
    pub fn new(session_id: impl Into<String>, scam_detected: bool, scam_type: ScamType) -> Self {
        Self {
            session_id: session_id.into(),
            started_at: Timestamp::now(),
            scam_detected,
            scam_type,
            transcript: Vec::new(),
            intelligence: IntelligenceSet::default(),
            message_count: 0,
            agent_notes: Vec::new(),
            reported: false,
        }
    }

    /// Appends a message, keeping the count in sync with the transcript.
    pub fn push_message(&mut self, message: Message) {
        self.transcript.push(message);
        self.message_count += 1;
    }

    /// Notes joined for the evaluator payload.
    pub fn joined_notes(&self) -> String {
        if self.agent_notes.is_empty() {
            "No additional notes".to_string()
        } else {
            self.agent_notes.join(" | ")
        }
    }
}

/// Engagement numbers derived from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    #[serde(rename = "engagementDurationSeconds")]
    pub duration_seconds: u64,
    #[serde(rename = "totalMessagesExchanged")]
    pub total_messages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new("wa-123", true, ScamType::UpiScam);
        assert_eq!(session.message_count, 0);
        assert!(session.transcript.is_empty());
        assert!(session.intelligence.is_empty());
        assert!(!session.reported);
    }

    #[test]
    fn push_message_keeps_count_in_sync() {
        let mut session = Session::new("wa-123", false, ScamType::Unknown);
        session.push_message(Message::from_scammer("hello"));
        session.push_message(Message::from_decoy("hi?"));

        assert_eq!(session.message_count, session.transcript.len() as u32);
        assert_eq!(session.transcript[0].sender, Sender::Scammer);
        assert_eq!(session.transcript[1].sender, Sender::Decoy);
    }

    #[test]
    fn joined_notes_defaults_when_empty() {
        let mut session = Session::new("wa-123", true, ScamType::BankFraud);
        assert_eq!(session.joined_notes(), "No additional notes");

        session.agent_notes.push("first".into());
        session.agent_notes.push("second".into());
        assert_eq!(session.joined_notes(), "first | second");
    }

    #[test]
    fn scam_type_round_trips_snake_case() {
        let json = serde_json::to_string(&ScamType::BankFraud).unwrap();
        assert_eq!(json, "\"bank_fraud\"");

        let back: ScamType = serde_json::from_str("\"upi_scam\"").unwrap();
        assert_eq!(back, ScamType::UpiScam);
    }

    #[test]
    fn not_scam_deserializes_as_unknown() {
        let back: ScamType = serde_json::from_str("\"not_scam\"").unwrap();
        assert_eq!(back, ScamType::Unknown);
    }

    #[test]
    fn sender_wire_names_match_platform_protocol() {
        assert_eq!(serde_json::to_string(&Sender::Scammer).unwrap(), "\"scammer\"");
        assert_eq!(serde_json::to_string(&Sender::Decoy).unwrap(), "\"user\"");
    }

    #[test]
    fn session_json_round_trip() {
        let mut session = Session::new("wa-9", true, ScamType::Phishing);
        session.push_message(Message::from_scammer("click http://bit.ly/x"));
        session.agent_notes.push("initial detection".into());

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
