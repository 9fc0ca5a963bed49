//! Application services: the conversation engine behind the HTTP surface.

pub mod agent;
pub mod callback;
pub mod detector;
pub mod engage;
pub mod extraction;
pub mod prompts;
pub mod session_store;

pub use agent::DecoyAgent;
pub use callback::CallbackService;
pub use detector::ScamDetector;
pub use engage::{EngageReply, EngageRequest, EngagementService};
pub use extraction::IntelExtractor;
pub use session_store::SessionStore;
