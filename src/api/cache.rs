//! In-memory response cache for API calls
//!
//! Entries are keyed by endpoint + serialized parameters and stamped with the
//! instant they were stored. Freshness is checked on lookup; nothing is ever
//! evicted, a stale entry simply sits there until a successful response for
//! the same key overwrites it.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default freshness window (10 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// A cached response body
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Parsed JSON, shared with every caller that hits this entry
    data: Arc<Value>,
    /// When the response was stored
    timestamp: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) < ttl
    }
}

/// Time-boxed response cache owned by a single API client
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    /// Create a cache with the given freshness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Build the cache key for a request: `{path}_{params as JSON}`
    pub fn key(path: &str, params: &[(&str, String)]) -> String {
        let params = serde_json::to_string(params).unwrap_or_default();
        format!("{}_{}", path, params)
    }

    /// Return the entry for `key` if it is still fresh at `now`
    pub fn lookup(&self, key: &str, now: Instant) -> Option<Arc<Value>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.data))
    }

    /// Store (or overwrite) the entry for `key`, stamped with `now`
    pub fn store(&self, key: String, data: Arc<Value>, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                data,
                timestamp: now,
            },
        );
    }

    /// Number of entries held, stale ones included
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_includes_path_and_params() {
        let key = ResponseCache::key("/movie/popular", &[("page", "1".to_string())]);
        assert_eq!(key, r#"/movie/popular_[["page","1"]]"#);

        let other = ResponseCache::key("/movie/popular", &[("page", "2".to_string())]);
        assert_ne!(key, other);

        assert_eq!(ResponseCache::key("/tv/1/videos", &[]), "/tv/1/videos_[]");
    }

    #[test]
    fn test_lookup_missing_key() {
        let cache = ResponseCache::default();
        assert!(cache.lookup("nope", Instant::now()).is_none());
    }

    #[test]
    fn test_fresh_entry_returns_same_value() {
        let cache = ResponseCache::default();
        let now = Instant::now();
        let data = Arc::new(json!({"results": []}));

        cache.store("k".to_string(), Arc::clone(&data), now);

        let hit = cache.lookup("k", now + Duration::from_secs(60)).unwrap();
        assert!(Arc::ptr_eq(&hit, &data));
    }

    #[test]
    fn test_entry_expires_after_window() {
        let cache = ResponseCache::new(Duration::from_secs(600));
        let now = Instant::now();
        cache.store("k".to_string(), Arc::new(json!(1)), now);

        assert!(cache.lookup("k", now + Duration::from_secs(599)).is_some());
        assert!(cache.lookup("k", now + Duration::from_secs(600)).is_none());
    }

    #[test]
    fn test_stale_entry_is_kept_until_overwritten() {
        let cache = ResponseCache::new(Duration::from_secs(1));
        let now = Instant::now();
        cache.store("k".to_string(), Arc::new(json!(1)), now);

        let later = now + Duration::from_secs(5);
        assert!(cache.lookup("k", later).is_none());
        assert_eq!(cache.len(), 1);

        cache.store("k".to_string(), Arc::new(json!(2)), later);
        assert_eq!(cache.len(), 1);
        assert_eq!(*cache.lookup("k", later).unwrap(), json!(2));
    }
}
