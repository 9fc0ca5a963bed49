//! Redis-backed key-value store for session records.
//!
//! Uses SET with EX for TTL-bounded writes; the store itself handles idle
//! expiry, so the engine never deletes sessions except on operator action.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::ports::{KeyValueStore, StoreError};

/// Redis adapter over a multiplexed connection.
///
/// The connection is cheap to clone; each call clones it so concurrent
/// tasks never contend on a single handle.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connects to Redis at the given URL.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::unavailable(format!("invalid redis URL: {e}")))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| StoreError::unavailable(format!("redis connect failed: {e}")))?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex(key, value, ttl.as_secs())
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    // Redis integration tests require a running Redis instance and are run
    // separately from unit tests.
    //
    // #[tokio::test]
    // #[ignore] // Run with: cargo test -- --ignored
    // async fn redis_round_trip() {
    //     let store = RedisStore::connect("redis://127.0.0.1/").await.unwrap();
    //     store.set("k", "v", Duration::from_secs(60)).await.unwrap();
    //     assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    // }
}
