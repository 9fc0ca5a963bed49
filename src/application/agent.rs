//! Decoy persona reply generation.
//!
//! Replies come from the completion service at high temperature, staged by
//! conversation turn: early turns play confused, later turns play willing
//! so the scammer keeps revealing payment details. When the provider is
//! unavailable, canned replies from the per-scam-type strategy keep the
//! conversation alive. Generation never fails.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::adapters::ai::CredentialRotator;
use crate::application::prompts::{
    strategy_for, DECOY_SYSTEM_PROMPT, GENERIC_FALLBACKS,
};
use crate::domain::{Message, ScamType, Sender};
use crate::ports::{AiError, CompletionRequest, MessageRole};

/// Urgency read off a scammer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    High,
}

/// What the scammer is asking for, when identifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Payment,
    Credentials,
    Link,
    Information,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Payment => "payment",
            RequestType::Credentials => "credentials",
            RequestType::Link => "link",
            RequestType::Information => "information",
        }
    }
}

/// Behavioral read of one scammer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageAnalysis {
    pub urgency: Urgency,
    pub threat_detected: bool,
    pub request_type: Option<RequestType>,
    pub emotional_manipulation: bool,
}

/// Keyword-based behavioral analysis of a scammer message.
pub fn analyze_message(message: &str) -> MessageAnalysis {
    let lower = message.to_lowercase();
    let any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    let urgency = if any(&["urgent", "immediately", "now", "today", "asap", "hurry", "quick"]) {
        Urgency::High
    } else {
        Urgency::Low
    };

    let threat_detected = any(&[
        "blocked", "suspended", "closed", "terminated", "legal action", "police",
    ]);

    // First matching category wins; payment outranks the rest.
    let request_type = if any(&["send", "pay", "transfer", "₹", "rs"]) {
        Some(RequestType::Payment)
    } else if any(&["otp", "code", "pin", "password"]) {
        Some(RequestType::Credentials)
    } else if any(&["click", "link", "visit", "website"]) {
        Some(RequestType::Link)
    } else if any(&["verify", "confirm", "update", "details"]) {
        Some(RequestType::Information)
    } else {
        None
    };

    let emotional_manipulation = any(&[
        "congratulations", "winner", "lucky", "selected", "prize", "free",
    ]);

    MessageAnalysis {
        urgency,
        threat_detected,
        request_type,
        emotional_manipulation,
    }
}

/// One-line behavioral note for the session record.
pub fn behavior_note(scam_type: ScamType, analysis: &MessageAnalysis, turn: u32) -> String {
    let mut parts = vec![format!("Scam type: {scam_type}")];
    if analysis.urgency == Urgency::High {
        parts.push("using urgency tactics".to_string());
    }
    if analysis.threat_detected {
        parts.push("making threats".to_string());
    }
    if let Some(request) = analysis.request_type {
        parts.push(format!("requesting {}", request.as_str()));
    }
    if analysis.emotional_manipulation {
        parts.push("using emotional manipulation".to_string());
    }
    parts.push(format!("turn {turn}"));
    parts.join(", ")
}

/// Per-turn engagement stance. Early turns act confused; late turns act
/// compliant to draw out payment details.
fn strategy_for_turn(turn: u32, scam_type: ScamType) -> String {
    let mut strategy = if turn <= 2 {
        "Show confusion and concern. Ask 'why' questions. Be worried."
    } else if turn <= 5 {
        "Show concern and ask for more details. Request clarification."
    } else if turn <= 10 {
        "Show interest but ask for official information or proof. Be cautious."
    } else {
        "Show willingness to cooperate. Ask for step-by-step instructions."
    }
    .to_string();

    if let Some(per_type) = strategy_for(scam_type) {
        strategy.push_str(&format!("\n\nScam type: {scam_type}"));
        strategy.push_str(&format!("\nPersona: {}", per_type.persona));
    }
    strategy
}

fn conversation_context(history: &[Message]) -> String {
    if history.is_empty() {
        return "This is the first message in the conversation.".to_string();
    }
    let mut context = "Previous conversation:\n".to_string();
    for message in history {
        let role = match message.sender {
            Sender::Scammer => "Scammer",
            Sender::Decoy => "You",
        };
        context.push_str(&format!("{role}: {}\n", message.text));
    }
    context
}

/// One of the persona's typing quirks, applied by index so the choice can
/// be tested deterministically.
fn apply_imperfection(text: &str, choice: usize, coin: bool) -> String {
    match choice % 5 {
        0 => text.replace('?', "??"),
        1 => text.replace('.', ".."),
        2 => {
            let mut chars = text.chars();
            match chars.next() {
                Some(first) if first.is_uppercase() => {
                    first.to_lowercase().collect::<String>() + chars.as_str()
                }
                _ => text.to_string(),
            }
        }
        3 if coin => text.replace("you", "u"),
        4 if text.to_lowercase().contains("okay") => text.replace("okay", "ok"),
        _ => text.to_string(),
    }
}

/// Reply generator for the decoy persona.
pub struct DecoyAgent {
    rotator: Arc<CredentialRotator>,
}

impl DecoyAgent {
    pub fn new(rotator: Arc<CredentialRotator>) -> Self {
        Self { rotator }
    }

    fn humanize(&self, text: String) -> String {
        let mut rng = rand::thread_rng();
        // 30% of replies get one typing quirk.
        if rng.gen::<f64>() > 0.3 {
            return text;
        }
        let choice = rng.gen_range(0..5);
        let coin = rng.gen_bool(0.5);
        apply_imperfection(&text, choice, coin)
    }

    fn fallback_reply(&self, scam_type: ScamType, history_len: usize) -> String {
        let mut rng = rand::thread_rng();
        let pool = match strategy_for(scam_type) {
            Some(strategy) if history_len == 0 => strategy.initial_responses,
            Some(strategy) => strategy.follow_up_questions,
            None => GENERIC_FALLBACKS,
        };
        pool.choose(&mut rng)
            .copied()
            .unwrap_or(GENERIC_FALLBACKS[0])
            .to_string()
    }

    async fn generate(
        &self,
        current_message: &str,
        history: &[Message],
        scam_type: ScamType,
        language: &str,
    ) -> Result<String, AiError> {
        let provider = self.rotator.next().ok_or(AiError::NoCredentials)?;

        // Turn number counts our own replies so far.
        let turn = history
            .iter()
            .filter(|m| m.sender == Sender::Decoy)
            .count() as u32
            + 1;
        let context = conversation_context(history);
        let strategy = strategy_for_turn(turn, scam_type);
        let language_instruction = if language.eq_ignore_ascii_case("english") {
            String::new()
        } else {
            format!(
                "\n\nIMPORTANT: Respond in {language} language. \
                 Match the language style of the scammer's message."
            )
        };

        let prompt = format!(
            r#"{context}

Current message from scammer: "{current_message}"

{strategy}{language_instruction}

Generate a natural, human-like response (1-3 sentences only). Remember:
- Stay in character as a concerned individual
- Don't reveal you know it's a scam
- Ask questions that make them reveal more information
- Show appropriate emotions
- Keep it brief and natural
"#
        );

        let request = CompletionRequest::new()
            .with_system_prompt(DECOY_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt)
            .with_temperature(0.8)
            .with_max_tokens(150);

        let response = provider.complete(request).await?;
        Ok(response.content.trim().to_string())
    }

    /// Generates the decoy's next reply. Never fails: provider errors fall
    /// back to canned strategy replies.
    pub async fn reply(
        &self,
        session_id: &str,
        current_message: &str,
        history: &[Message],
        scam_type: ScamType,
        language: &str,
    ) -> String {
        match self
            .generate(current_message, history, scam_type, language)
            .await
        {
            Ok(text) => {
                tracing::info!(session_id, language, "decoy reply generated");
                self.humanize(text)
            }
            Err(err) => {
                tracing::warn!(session_id, %err, "reply generation failed, using canned reply");
                self.fallback_reply(scam_type, history.len())
            }
        }
    }
}

impl std::fmt::Debug for DecoyAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoyAgent").finish_non_exhaustive()
    }
}
