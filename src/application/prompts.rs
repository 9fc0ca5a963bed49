//! Prompt text and canned reply material for the decoy persona.

use crate::domain::ScamType;

/// System prompt that keeps the persona in character.
pub const DECOY_SYSTEM_PROMPT: &str = r#"You are roleplaying as a concerned individual who has received a suspicious message.
Your goal is to engage naturally while extracting information from the sender.

PERSONA:
- You are slightly worried and confused about the situation
- You ask questions to understand what's happening
- You make occasional typos or grammar mistakes to seem human
- You are cautious but can be gradually convinced
- You never reveal that you know it's a scam
- You show appropriate emotions (worry, confusion, curiosity)

OBJECTIVES:
- Keep the conversation going naturally
- Extract information: bank accounts, UPI IDs, phone numbers, links, names
- Ask for "proof" or "verification details"
- Show interest in their "solution" or "offer"
- Gradually build trust with the sender

RULES:
- NEVER say "I know this is a scam" or anything similar
- NEVER be too smart or overly suspicious
- Respond naturally in 1-3 sentences only
- Match the language tone and style of the sender
- Show hesitation before agreeing to anything
- Ask clarifying questions that make them reveal more details

RESPONSE STYLE:
- Use casual language
- Include occasional typos (but not too many)
- Show emotions through words (worried, confused, interested)
- Be polite and respectful
- Don't use complex vocabulary
"#;

/// Reply for traffic the detector classified as benign.
pub const NON_SCAM_RESPONSE: &str = "I'm sorry, I don't understand what you're asking. \
If you need assistance, please contact official support channels. Thank you.";

/// Generic canned replies when no scam-type strategy applies.
pub const GENERIC_FALLBACKS: &[&str] = &[
    "Can you tell me more about this?",
    "I'm not sure I understand. Can you explain?",
    "What do I need to do exactly?",
    "Is this really necessary?",
    "How do I know this is legitimate?",
];

/// Per-scam-type engagement strategy: a persona hint for the prompt plus
/// canned replies for provider outages.
pub struct ScamStrategy {
    pub persona: &'static str,
    pub initial_responses: &'static [&'static str],
    pub follow_up_questions: &'static [&'static str],
}

/// Strategy for a scam type, or `None` for unclassified traffic.
pub fn strategy_for(scam_type: ScamType) -> Option<&'static ScamStrategy> {
    match scam_type {
        ScamType::BankFraud => Some(&ScamStrategy {
            persona: "worried_customer",
            initial_responses: &[
                "Oh no, really? What happened to my account?",
                "This is concerning. Why would my account be blocked?",
                "I didn't do anything wrong. Can you help me fix this?",
            ],
            follow_up_questions: &[
                "Which bank are you calling from?",
                "How do I verify this is real?",
                "What information do you need from me?",
                "Can I call the bank directly instead?",
                "What's your employee ID or reference number?",
            ],
        }),
        ScamType::UpiScam => Some(&ScamStrategy {
            persona: "cautious_user",
            initial_responses: &[
                "Why do I need to send money?",
                "How much do I need to pay?",
                "Is this really necessary?",
                "Can you explain the process?",
            ],
            follow_up_questions: &[
                "What's your UPI ID?",
                "Will I get this money back?",
                "How long will this take?",
                "Do you have an official website?",
                "Can I pay through other methods?",
            ],
        }),
        ScamType::Phishing => Some(&ScamStrategy {
            persona: "confused_user",
            initial_responses: &[
                "I'm not sure I understand. What link?",
                "Is this website safe to open?",
                "Why do I need to click this?",
                "Can you send me more details first?",
            ],
            follow_up_questions: &[
                "What will happen if I click the link?",
                "Is this an official website?",
                "Do I need to enter my password?",
                "Can you verify this is legitimate?",
                "What information will you need from me?",
            ],
        }),
        ScamType::PrizeScam => Some(&ScamStrategy {
            persona: "excited_but_cautious",
            initial_responses: &[
                "Really? I won something? How?",
                "This sounds amazing! What did I win?",
                "I don't remember entering any contest...",
                "How do I claim this prize?",
            ],
            follow_up_questions: &[
                "What's the total prize amount?",
                "Why do I need to pay a fee?",
                "When will I receive the prize?",
                "Can you send me official documents?",
                "What's your company name and registration?",
            ],
        }),
        ScamType::OtpScam => Some(&ScamStrategy {
            persona: "worried_user",
            initial_responses: &[
                "I just got an OTP. What's this for?",
                "Why do you need my OTP?",
                "Is it safe to share this code?",
                "I'm confused about this verification",
            ],
            follow_up_questions: &[
                "What will happen after I share the OTP?",
                "How long is this code valid?",
                "Can I verify this another way?",
                "Why can't you see the OTP on your end?",
                "Is this for security purposes?",
            ],
        }),
        ScamType::Impersonation => Some(&ScamStrategy {
            persona: "respectful_but_questioning",
            initial_responses: &[
                "How can I verify you're really from [organization]?",
                "This is unexpected. What's this about?",
                "Can you provide your official ID or badge number?",
                "I want to make sure this is legitimate",
            ],
            follow_up_questions: &[
                "What's your full name and department?",
                "Can I call your office directly?",
                "Do you have an official email address?",
                "What's your employee/officer ID?",
                "Can you send me official documentation?",
            ],
        }),
        ScamType::PaymentScam => Some(&ScamStrategy {
            persona: "hesitant_payer",
            initial_responses: &[
                "Why do I need to make this payment?",
                "How much exactly do I need to pay?",
                "Is there another way to resolve this?",
                "Can I get a receipt or invoice?",
            ],
            follow_up_questions: &[
                "What payment method do you accept?",
                "What's your account number or UPI ID?",
                "Will I get a confirmation after payment?",
                "Can I pay in installments?",
                "What happens if I don't pay?",
            ],
        }),
        ScamType::InvestmentScam => Some(&ScamStrategy {
            persona: "interested_but_cautious",
            initial_responses: &[
                "This sounds interesting. Tell me more?",
                "What kind of returns can I expect?",
                "Is this investment safe?",
                "How does this work exactly?",
            ],
            follow_up_questions: &[
                "What's the minimum investment amount?",
                "Do you have any success stories?",
                "Is this registered with authorities?",
                "What are the risks involved?",
                "Can I withdraw my money anytime?",
            ],
        }),
        ScamType::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_classified_type_has_a_strategy() {
        for scam_type in [
            ScamType::BankFraud,
            ScamType::UpiScam,
            ScamType::Phishing,
            ScamType::PrizeScam,
            ScamType::OtpScam,
            ScamType::Impersonation,
            ScamType::PaymentScam,
            ScamType::InvestmentScam,
        ] {
            let strategy = strategy_for(scam_type).unwrap();
            assert!(!strategy.initial_responses.is_empty());
            assert!(!strategy.follow_up_questions.is_empty());
        }
    }

    #[test]
    fn unknown_type_has_no_strategy() {
        assert!(strategy_for(ScamType::Unknown).is_none());
    }
}
