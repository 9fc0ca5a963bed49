//! Domain layer containing the typed records the engine operates on.
//!
//! # Module Organization
//!
//! - `timestamp` - UTC point-in-time value object
//! - `session` - Conversation session record, transcript messages, scam types
//! - `intelligence` - Extracted artifacts, provenance annotation, merge functions
//! - `detection` - Scam classification verdict

pub mod detection;
pub mod intelligence;
pub mod session;
pub mod timestamp;

pub use detection::ScamVerdict;
pub use intelligence::{
    merge_passes, AnnotatedIntelligence, IntelligenceItem, IntelligenceSet, ItemSource,
    CONFIDENCE_BOTH, CONFIDENCE_GENERATIVE, CONFIDENCE_PATTERN,
};
pub use session::{EngagementMetrics, Message, ScamType, Sender, Session};
pub use timestamp::Timestamp;
