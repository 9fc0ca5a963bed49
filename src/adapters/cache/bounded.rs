//! Bounded in-process result cache with frequency-biased eviction.
//!
//! Fixed capacity; on overflow the entry with the smallest access counter
//! is evicted. Counters only grow (no decay), so frequently repeated inputs
//! become eviction-resistant. An ordered index of (access count, key) pairs
//! is kept alongside the map, so lookup, insert, and eviction are all
//! O(log n). Not shared across instances; a miss just re-runs the work.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::ports::MetricsSink;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    access_count: u64,
}

/// Map plus its eviction index; the two are mutated together under one lock.
struct CacheState<V> {
    entries: HashMap<String, Entry<V>>,
    /// (access_count, key), ordered so the first element is the victim.
    by_access: BTreeSet<(u64, String)>,
}

/// Fixed-capacity cache keyed by content fingerprint.
///
/// A single mutex guards the state; both operations are short.
pub struct BoundedCache<V> {
    state: Mutex<CacheState<V>>,
    capacity: usize,
    metrics: Arc<dyn MetricsSink>,
}

impl<V: Clone> BoundedCache<V> {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                by_access: BTreeSet::new(),
            }),
            capacity: capacity.max(1),
            metrics,
        }
    }

    /// Looks up a value, bumping its access counter on hit.
    ///
    /// Every call reports hit or miss to the metrics sink.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock().unwrap();
        let CacheState { entries, by_access } = &mut *state;
        match entries.get_mut(key) {
            Some(entry) => {
                by_access.remove(&(entry.access_count, key.to_string()));
                entry.access_count += 1;
                by_access.insert((entry.access_count, key.to_string()));
                self.metrics.record_cache_hit();
                Some(entry.value.clone())
            }
            None => {
                self.metrics.record_cache_miss();
                None
            }
        }
    }

    /// Inserts a value, evicting the least-accessed entry if full.
    ///
    /// New and overwritten entries start at access count 0; ties at eviction
    /// break toward the lexicographically smallest key.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut state = self.state.lock().unwrap();
        let CacheState { entries, by_access } = &mut *state;

        if let Some(existing) = entries.get_mut(&key) {
            by_access.remove(&(existing.access_count, key.clone()));
            existing.value = value;
            existing.access_count = 0;
            by_access.insert((0, key));
            return;
        }

        if entries.len() >= self.capacity {
            if let Some((_, evict)) = by_access.pop_first() {
                entries.remove(&evict);
                tracing::debug!(key = %evict, "cache evicted");
            }
        }

        by_access.insert((0, key.clone()));
        entries.insert(
            key,
            Entry {
                value,
                access_count: 0,
            },
        );
    }

    /// Current entry count.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.entries.clear();
        state.by_access.clear();
    }
}

impl<V> std::fmt::Debug for BoundedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::metrics::NoOpMetrics;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn cache(capacity: usize) -> BoundedCache<String> {
        BoundedCache::new(capacity, Arc::new(NoOpMetrics))
    }

    #[test]
    fn get_returns_inserted_value() {
        let cache = cache(4);
        cache.set("a", "1".to_string());
        assert_eq!(cache.get("a").as_deref(), Some("1"));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn overflow_evicts_untouched_entry_first() {
        let cache = cache(2);
        cache.set("first", "1".to_string());
        cache.set("second", "2".to_string());

        // Touch "first" so "second" is the least-accessed entry.
        cache.get("first");
        cache.set("third", "3".to_string());

        assert_eq!(cache.len(), 2);
        assert!(cache.get("first").is_some());
        assert!(cache.get("second").is_none());
        assert!(cache.get("third").is_some());
    }

    #[test]
    fn capacity_plus_one_inserts_evict_one_entry() {
        let cache = cache(3);
        for i in 0..4 {
            cache.set(format!("k{i}"), i.to_string());
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn overwriting_existing_key_does_not_evict() {
        let cache = cache(2);
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.set("a", "1b".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").as_deref(), Some("1b"));
        assert_eq!(cache.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn frequently_read_key_outlives_never_read_key() {
        let cache = cache(2);
        cache.set("hot", "h".to_string());
        cache.set("cold", "c".to_string());
        for _ in 0..10 {
            cache.get("hot");
        }

        cache.set("new", "n".to_string());
        assert!(cache.get("hot").is_some());
        assert!(cache.get("cold").is_none());
    }

    #[test]
    fn index_follows_counter_across_many_updates() {
        let cache = cache(3);
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.set("c", "3".to_string());

        cache.get("a");
        cache.get("a");
        cache.get("b");
        // Overwrite resets "b" to count 0, making it the victim.
        cache.set("b", "2b".to_string());

        cache.set("d", "4".to_string());
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
    }

    #[test]
    fn eviction_handles_multibyte_keys() {
        let cache = cache(1);
        cache.set("сообщение-приманка", "1".to_string());
        cache.set("next", "2".to_string());

        assert_eq!(cache.len(), 1);
        assert!(cache.get("next").is_some());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = cache(2);
        cache.set("a", "1".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[derive(Default)]
    struct CountingMetrics {
        hits: AtomicU32,
        misses: AtomicU32,
    }

    impl crate::ports::MetricsSink for CountingMetrics {
        fn record_cache_hit(&self) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        fn record_cache_miss(&self) {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn every_get_reports_hit_or_miss() {
        let metrics = Arc::new(CountingMetrics::default());
        let cache: BoundedCache<String> = BoundedCache::new(4, metrics.clone());

        cache.get("absent");
        cache.set("a", "1".to_string());
        cache.get("a");
        cache.get("a");

        assert_eq!(metrics.hits.load(Ordering::SeqCst), 2);
        assert_eq!(metrics.misses.load(Ordering::SeqCst), 1);
    }
}
