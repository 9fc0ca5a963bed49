//! Session store - durable per-conversation state over the key-value port.
//!
//! Every mutating operation is a read-modify-write against the external
//! store. RMW alone is not atomic, so the store holds a per-key async mutex
//! for the whole get-mutate-put sequence; concurrent turns for the same
//! session serialize instead of silently dropping each other's writes.
//! The TTL is refreshed to the full configured duration on every write, so
//! an active session never expires mid-conversation and an idle one expires
//! exactly TTL seconds after its last write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::{EngagementMetrics, IntelligenceSet, Message, ScamType, Session, Timestamp};
use crate::ports::{KeyValueStore, StoreError};

/// Service wrapping the key-value backend with typed session operations.
///
/// Mutating operations return `Ok(false)` when the session is absent and
/// `Err` only for backend failures, so callers can tell "no session" from
/// "store down".
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    /// Per-key mutexes serializing get-modify-put sequences.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn storage_key(session_id: &str) -> String {
        format!("session:{session_id}")
    }

    async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        // An entry held only by the map belongs to a finished operation;
        // sweeping here keeps the map bounded by in-flight sessions.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    async fn lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }

    async fn load(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let key = Self::storage_key(session_id);
        match self.store.get(&key).await? {
            Some(raw) => {
                let session = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::corrupt(&key, e.to_string()))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn persist(&self, session: &Session) -> Result<(), StoreError> {
        let key = Self::storage_key(&session.session_id);
        let raw = serde_json::to_string(session)
            .map_err(|e| StoreError::corrupt(&key, e.to_string()))?;
        self.store.set(&key, &raw, self.ttl).await
    }

    /// Applies a mutation under the session's key lock.
    ///
    /// Returns `Ok(false)` without writing when the session is absent.
    async fn mutate<F>(&self, session_id: &str, mutate: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Session),
    {
        let lock = self.lock_for(session_id).await;
        let _guard = lock.lock().await;

        let Some(mut session) = self.load(session_id).await? else {
            return Ok(false);
        };
        mutate(&mut session);
        self.persist(&session).await?;
        Ok(true)
    }

    /// Writes a fresh session, overwriting any prior record for the key.
    pub async fn create(
        &self,
        session_id: &str,
        scam_detected: bool,
        scam_type: ScamType,
    ) -> Result<Session, StoreError> {
        let lock = self.lock_for(session_id).await;
        let _guard = lock.lock().await;

        let session = Session::new(session_id, scam_detected, scam_type);
        self.persist(&session).await?;
        tracing::info!(session_id, scam_detected, scam_type = %scam_type, "session created");
        Ok(session)
    }

    /// Fetches a session, or `None` if absent or expired.
    pub async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        self.load(session_id).await
    }

    /// Appends a transcript message, keeping the count in sync.
    pub async fn append_message(
        &self,
        session_id: &str,
        message: Message,
    ) -> Result<bool, StoreError> {
        self.mutate(session_id, |session| session.push_message(message))
            .await
    }

    /// Set-unions newly extracted intelligence into the session, per category.
    pub async fn merge_intelligence(
        &self,
        session_id: &str,
        incoming: &IntelligenceSet,
    ) -> Result<bool, StoreError> {
        self.mutate(session_id, |session| session.intelligence.merge(incoming))
            .await
    }

    /// Appends a free-text agent note.
    pub async fn append_note(&self, session_id: &str, note: &str) -> Result<bool, StoreError> {
        let note = note.to_string();
        self.mutate(session_id, move |session| session.agent_notes.push(note))
            .await
    }

    /// Marks the session as reported. Never cleared afterwards.
    pub async fn mark_reported(&self, session_id: &str) -> Result<bool, StoreError> {
        self.mutate(session_id, |session| session.reported = true)
            .await
    }

    /// Engagement metrics: wall-clock duration since creation plus count.
    pub async fn metrics(&self, session_id: &str) -> Result<Option<EngagementMetrics>, StoreError> {
        let Some(session) = self.load(session_id).await? else {
            return Ok(None);
        };
        Ok(Some(EngagementMetrics {
            duration_seconds: Timestamp::now().secs_since(&session.started_at),
            total_messages: session.message_count,
        }))
    }

    /// Removes a session. Operator action only; normal expiry is TTL-driven.
    pub async fn delete(&self, session_id: &str) -> Result<(), StoreError> {
        let lock = self.lock_for(session_id).await;
        let _guard = lock.lock().await;
        self.store.delete(&Self::storage_key(session_id)).await?;
        tracing::info!(session_id, "session deleted");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::kv::InMemoryStore;
    use crate::domain::Sender;

    fn store() -> (Arc<InMemoryStore>, SessionStore) {
        let kv = Arc::new(InMemoryStore::new());
        let sessions = SessionStore::new(kv.clone(), Duration::from_secs(3600));
        (kv, sessions)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();

        let loaded = sessions.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.session_id, "s-1");
        assert!(loaded.scam_detected);
        assert_eq!(loaded.scam_type, ScamType::UpiScam);
        assert_eq!(loaded.message_count, 0);
    }

    #[tokio::test]
    async fn create_overwrites_prior_record() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();
        sessions
            .append_message("s-1", Message::from_scammer("hi"))
            .await
            .unwrap();

        sessions.create("s-1", false, ScamType::Unknown).await.unwrap();
        let loaded = sessions.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.message_count, 0);
        assert!(!loaded.scam_detected);
    }

    #[tokio::test]
    async fn append_message_on_absent_session_fails_without_writing() {
        let (kv, sessions) = store();
        let accepted = sessions
            .append_message("ghost", Message::from_scammer("hi"))
            .await
            .unwrap();
        assert!(!accepted);
        assert!(kv.is_empty());
    }

    #[tokio::test]
    async fn message_count_matches_accepted_appends() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::BankFraud).await.unwrap();

        for i in 0..3 {
            let accepted = sessions
                .append_message("s-1", Message::from_scammer(format!("msg {i}")))
                .await
                .unwrap();
            assert!(accepted);
        }

        let metrics = sessions.metrics("s-1").await.unwrap().unwrap();
        assert_eq!(metrics.total_messages, 3);

        let loaded = sessions.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.transcript.len(), 3);
        assert_eq!(loaded.transcript[0].sender, Sender::Scammer);
    }

    #[tokio::test]
    async fn merge_intelligence_accumulates_across_turns() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();

        let first = IntelligenceSet {
            upi_ids: vec!["first@paytm".into()],
            ..Default::default()
        };
        let second = IntelligenceSet {
            upi_ids: vec!["second@phonepe".into()],
            ..Default::default()
        };
        sessions.merge_intelligence("s-1", &first).await.unwrap();
        sessions.merge_intelligence("s-1", &second).await.unwrap();
        // Replay of the first turn must not duplicate.
        sessions.merge_intelligence("s-1", &first).await.unwrap();

        let loaded = sessions.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.intelligence.upi_ids.len(), 2);
        assert!(loaded.intelligence.upi_ids.contains(&"first@paytm".to_string()));
        assert!(loaded.intelligence.upi_ids.contains(&"second@phonepe".to_string()));
    }

    #[tokio::test]
    async fn notes_and_reported_flag_persist() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::OtpScam).await.unwrap();
        sessions.append_note("s-1", "initial detection").await.unwrap();
        sessions.mark_reported("s-1").await.unwrap();

        let loaded = sessions.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.agent_notes, vec!["initial detection"]);
        assert!(loaded.reported);
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_error_not_false() {
        let (kv, sessions) = store();
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();
        kv.set_failing(true);

        let result = sessions
            .append_message("s-1", Message::from_scammer("hi"))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn corrupt_record_surfaces_as_corrupt_error() {
        let (kv, sessions) = store();
        kv.set("session:bad", "not json", Duration::from_secs(60))
            .await
            .unwrap();

        let result = sessions.get("bad").await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn concurrent_turns_do_not_lose_writes() {
        let (kv, _) = store();
        let sessions = Arc::new(SessionStore::new(kv, Duration::from_secs(3600)));
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let sessions = Arc::clone(&sessions);
            handles.push(tokio::spawn(async move {
                sessions
                    .append_message("s-1", Message::from_scammer(format!("msg {i}")))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let loaded = sessions.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.message_count, 20);
        assert_eq!(loaded.transcript.len(), 20);
    }

    #[tokio::test]
    async fn idle_key_locks_are_swept() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();
        sessions.create("s-2", true, ScamType::UpiScam).await.unwrap();

        // The next acquisition sweeps the two idle entries out.
        sessions.create("s-3", true, ScamType::UpiScam).await.unwrap();
        assert_eq!(sessions.lock_count().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let (_, sessions) = store();
        sessions.create("s-1", true, ScamType::UpiScam).await.unwrap();
        sessions.delete("s-1").await.unwrap();
        assert!(sessions.get("s-1").await.unwrap().is_none());
    }
}
