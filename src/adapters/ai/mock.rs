//! Mock AI Provider for testing.
//!
//! Configurable to return queued responses or inject errors, with call
//! tracking for verification, so services exercise their fallback paths
//! without touching a real API.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockProvider::new()
//!     .with_response(r#"{"is_scam": true}"#);
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, ProviderInfo,
};

/// A configured mock outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    Success(String),
    Error(MockError),
}

/// Mock error kinds for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Timeout { timeout_secs: u32 },
    MalformedOutput,
}

impl From<MockError> for AiError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AiError::RateLimited { retry_after_secs },
            MockError::Unavailable { message } => AiError::unavailable(message),
            MockError::AuthenticationFailed => AiError::AuthenticationFailed,
            MockError::Timeout { timeout_secs } => AiError::Timeout { timeout_secs },
            MockError::MalformedOutput => AiError::parse("malformed output"),
        }
    }
}

/// Mock completion provider.
///
/// Queued outcomes are consumed in order; once the queue is empty, every
/// call returns the default response.
#[derive(Debug, Clone)]
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    default_response: String,
    info: ProviderInfo,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::named("mock-model")
    }

    /// Mock with a distinguishable model name (used by rotator tests).
    pub fn named(model: impl Into<String>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            default_response: "{}".to_string(),
            info: ProviderInfo::new("mock", model),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Error(error));
        self
    }

    /// Sets the response returned once the queue is drained.
    pub fn with_default_response(mut self, content: impl Into<String>) -> Self {
        self.default_response = content.into();
        self
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Copies of every request received.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        let outcome = self.outcomes.lock().unwrap().pop_front();
        match outcome {
            Some(MockOutcome::Success(content)) => Ok(CompletionResponse {
                content,
                model: self.info.model.clone(),
            }),
            Some(MockOutcome::Error(err)) => Err(err.into()),
            None => Ok(CompletionResponse {
                content: self.default_response.clone(),
                model: self.info.model.clone(),
            }),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_outcomes_consumed_in_order() {
        let provider = MockProvider::new()
            .with_response("first")
            .with_error(MockError::Timeout { timeout_secs: 5 })
            .with_default_response("rest");

        let first = provider.complete(CompletionRequest::new()).await.unwrap();
        assert_eq!(first.content, "first");

        let second = provider.complete(CompletionRequest::new()).await;
        assert!(matches!(second, Err(AiError::Timeout { .. })));

        let third = provider.complete(CompletionRequest::new()).await.unwrap();
        assert_eq!(third.content, "rest");

        assert_eq!(provider.call_count(), 3);
    }
}
