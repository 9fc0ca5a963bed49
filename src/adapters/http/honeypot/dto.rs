//! HTTP DTOs for the honeypot endpoints.
//!
//! Field names are fixed by the platform protocol (camelCase on the wire).
//! These types decouple the wire shapes from domain types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::EngageRequest;
use crate::domain::{Message, Sender, Timestamp};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One transcript message as the platform sends it.
///
/// Timestamps arrive as free-form strings; anything that is not RFC 3339 is
/// replaced with the receive time rather than rejecting the whole request.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl WireMessage {
    fn into_message(self) -> Message {
        let sender = match self.sender.as_str() {
            "scammer" => Sender::Scammer,
            _ => Sender::Decoy,
        };
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
            .unwrap_or_else(Timestamp::now);
        Message {
            sender,
            text: self.text,
            timestamp,
        }
    }
}

/// Channel metadata attached to a conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireMetadata {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl WireMetadata {
    fn into_map(self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(channel) = self.channel {
            map.insert("channel".to_string(), channel);
        }
        if let Some(language) = self.language {
            map.insert("language".to_string(), language);
        }
        if let Some(locale) = self.locale {
            map.insert("locale".to_string(), locale);
        }
        map
    }
}

/// One turn of scammer input from the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct HoneypotRequest {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub message: WireMessage,
    #[serde(rename = "conversationHistory", default)]
    pub conversation_history: Vec<WireMessage>,
    #[serde(default)]
    pub metadata: Option<WireMetadata>,
}

impl HoneypotRequest {
    /// Converts the wire request into the engine's turn input.
    pub fn into_engage_request(self) -> EngageRequest {
        EngageRequest {
            session_id: self.session_id,
            text: self.message.text,
            history: self
                .conversation_history
                .into_iter()
                .map(WireMessage::into_message)
                .collect(),
            metadata: self.metadata.unwrap_or_default().into_map(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Per-turn reply payload.
#[derive(Debug, Clone, Serialize)]
pub struct HoneypotResponse {
    pub status: String,
    pub reply: String,
}

impl HoneypotResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
        }
    }
}

/// Response for a manually finalized session.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "scamDetected")]
    pub scam_detected: bool,
    #[serde(rename = "totalMessages")]
    pub total_messages: u32,
}

/// Health-check payload. No authentication required.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn current() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "honeytrap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error payload shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
