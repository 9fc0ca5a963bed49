//! Key-Value Store Port - TTL-bounded external storage for session records.
//!
//! The backend (Redis in production, in-memory in tests) only needs three
//! operations: GET, SET-with-TTL, and DEL. Values are UTF-8 JSON strings;
//! serialization stays with the caller.

use async_trait::async_trait;
use std::time::Duration;

/// Port for the external TTL-bounded key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetches a value, or `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value with the given time-to-live, overwriting any prior value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Removes a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Key-value backend errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend unreachable or erroring.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored payload failed to decode.
    #[error("corrupt record for key '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_key() {
        let err = StoreError::corrupt("session:abc", "invalid JSON");
        assert!(err.to_string().contains("session:abc"));
        assert!(err.to_string().contains("invalid JSON"));
    }
}
