//! Completion-service adapters: the Groq provider, the credential rotator,
//! and a mock for tests.

mod groq;
mod mock;
mod rotator;

pub use groq::{GroqConfig, GroqProvider};
pub use mock::{MockError, MockProvider};
pub use rotator::CredentialRotator;
