//! Result Cache
//!
//! Best-effort in-memory cache for analysis results, keyed by alert id.
//! A miss, an expired entry or an absent cache all degrade to direct
//! computation - never to an error.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;

use crate::constants;

const CACHE_MAX_SIZE: usize = 1000;

struct CachedEntry {
    value: Value,
    cached_at: i64,
}

pub struct ResultCache {
    entries: Mutex<HashMap<String, CachedEntry>>,
    ttl_secs: i64,
}

impl ResultCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_secs,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(constants::get_cache_ttl())
    }

    /// Get a cached value if present and inside the TTL window
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;

        let age = Utc::now().timestamp() - entry.cached_at;
        if age < self.ttl_secs {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn set(&self, key: &str, value: Value) {
        let mut entries = self.entries.lock();

        // Evict the oldest tenth when full
        if entries.len() >= CACHE_MAX_SIZE {
            let mut by_age: Vec<_> = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.cached_at))
                .collect();
            by_age.sort_by(|a, b| a.1.cmp(&b.1));

            for (key, _) in by_age.into_iter().take(CACHE_MAX_SIZE / 10) {
                entries.remove(&key);
            }
        }

        entries.insert(
            key.to_string(),
            CachedEntry {
                value,
                cached_at: Utc::now().timestamp(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_inside_ttl() {
        let cache = ResultCache::new(3600);
        cache.set("alert-1", json!({ "risk_score": 7 }));

        let hit = cache.get("alert-1").unwrap();
        assert_eq!(hit["risk_score"], 7);
    }

    #[test]
    fn test_miss_for_unknown_key() {
        let cache = ResultCache::new(3600);
        assert!(cache.get("nope").is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = ResultCache::new(0);
        cache.set("alert-1", json!({ "risk_score": 7 }));
        assert!(cache.get("alert-1").is_none());
    }

    #[test]
    fn test_eviction_keeps_size_bounded() {
        let cache = ResultCache::new(3600);
        for i in 0..(CACHE_MAX_SIZE + 5) {
            cache.set(&format!("alert-{}", i), json!(i));
        }
        assert!(cache.len() <= CACHE_MAX_SIZE);
    }

    #[test]
    fn test_clear() {
        let cache = ResultCache::new(3600);
        cache.set("alert-1", json!(1));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }
}
