//! In-memory TTL cache for API responses.
//!
//! Entries expire lazily on lookup and the cache evicts in insertion order
//! once it reaches capacity. Lookup statistics feed the `cache stats`
//! surface. Never stores error outcomes; callers only insert confirmed
//! successes.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
/// Default maximum number of cached entries.
pub const DEFAULT_MAXSIZE: usize = 100;

/// Derive a cache key from a URL and optional request parameters.
///
/// Parameters are sorted by name before being joined to the URL, so two
/// logically identical requests produce the same key regardless of
/// parameter insertion order. The combined string is hashed to a
/// fixed-length SHA-256 hex digest.
pub fn cache_key(url: &str, params: Option<&[(String, String)]>) -> String {
    let input = match params {
        None => url.to_owned(),
        Some(params) => {
            let mut sorted = params.to_vec();
            sorted.sort();
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(sorted.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            format!("{url}?{encoded}")
        }
    };
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Lookup statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub size: usize,
}

struct CacheEntry {
    value: String,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

/// Thread-safe TTL cache with a bounded size.
///
/// `get`/`has` treat entries older than the TTL as absent and evict them
/// lazily; there is no background sweep. Inserting past `maxsize` evicts
/// the least-recently-inserted entry (insertion order, not access order).
pub struct ApiCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
    maxsize: usize,
}

impl Default for ApiCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAXSIZE)
    }
}

impl ApiCache {
    pub fn new(ttl: Duration, maxsize: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            ttl,
            maxsize,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn maxsize(&self) -> usize {
        self.maxsize
    }

    /// Look up a cached value. Counts exactly one hit or miss per call.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut inner = self.lock();
        match inner.map.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                let value = entry.value.clone();
                inner.hits += 1;
                Some(value)
            }
            Some(_) => {
                inner.map.remove(key);
                inner.order.retain(|k| k != key);
                inner.misses += 1;
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite an entry, evicting the oldest insertion when the
    /// cache is full. Re-inserting an existing key refreshes its position.
    pub fn set(&self, key: String, value: String) {
        let mut inner = self.lock();
        if inner.map.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        } else {
            while inner.map.len() >= self.maxsize {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.map.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        inner.order.push_back(key.clone());
        inner.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove an entry if present.
    pub fn delete(&self, key: &str) {
        let mut inner = self.lock();
        inner.map.remove(key);
        inner.order.retain(|k| k != key);
    }

    /// Remove all entries. Lookup statistics are preserved.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.order.clear();
    }

    /// Whether a non-expired entry exists. Does not affect statistics.
    pub fn has(&self, key: &str) -> bool {
        let mut inner = self.lock();
        match inner.map.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => true,
            Some(_) => {
                inner.map.remove(key);
                inner.order.retain(|k| k != key);
                false
            }
            None => false,
        }
    }

    /// Current statistics. `hit_rate` is 0.0 before any lookup.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let total = inner.hits + inner.misses;
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            hit_rate: if total == 0 {
                0.0
            } else {
                inner.hits as f64 / total as f64
            },
            size: inner.map.len(),
        }
    }

    /// Drop all entries and statistics. Used for test isolation and the
    /// configuration-reload path.
    pub fn reset(&self) {
        *self.lock() = CacheInner::default();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        cache.set("k1".into(), "v1".into());
        assert_eq!(cache.get("k1"), Some("v1".to_string()));
    }

    #[test]
    fn miss_on_absent_key() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = ApiCache::new(Duration::from_millis(50), 10);
        cache.set("k1".into(), "v1".into());
        assert_eq!(cache.get("k1"), Some("v1".to_string()));

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.get("k1"), None);
        assert!(!cache.has("k1"));
    }

    #[test]
    fn overwrite_replaces_value() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        cache.set("k1".into(), "old".into());
        cache.set("k1".into(), "new".into());
        assert_eq!(cache.get("k1"), Some("new".to_string()));
    }

    #[test]
    fn evicts_oldest_insertion_at_capacity() {
        let cache = ApiCache::new(Duration::from_secs(60), 2);
        cache.set("a".into(), "1".into());
        cache.set("b".into(), "2".into());
        cache.set("c".into(), "3".into());

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2".to_string()));
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn reinsert_refreshes_eviction_position() {
        let cache = ApiCache::new(Duration::from_secs(60), 2);
        cache.set("a".into(), "1".into());
        cache.set("b".into(), "2".into());
        cache.set("a".into(), "1b".into());
        cache.set("c".into(), "3".into());

        // "b" was the oldest insertion after "a" was refreshed.
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some("1b".to_string()));
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn delete_and_clear() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        cache.set("a".into(), "1".into());
        cache.set("b".into(), "2".into());
        cache.delete("a");
        assert_eq!(cache.get("a"), None);

        cache.clear();
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn delete_missing_key_is_a_no_op() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        cache.delete("ghost");
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn hit_rate_tracks_lookups() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.set("k".into(), "v".into());
        cache.get("k");
        cache.get("k");
        cache.get("absent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn has_does_not_affect_stats() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        cache.set("k".into(), "v".into());
        assert!(cache.has("k"));
        assert!(!cache.has("absent"));
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn reset_drops_entries_and_stats() {
        let cache = ApiCache::new(Duration::from_secs(60), 10);
        cache.set("k".into(), "v".into());
        cache.get("k");
        cache.reset();
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn key_ignores_parameter_order() {
        let p1 = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        let p2 = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ];
        assert_eq!(
            cache_key("https://api.example.com", Some(&p1)),
            cache_key("https://api.example.com", Some(&p2))
        );
    }

    #[test]
    fn key_distinguishes_urls_and_values() {
        let p1 = vec![("a".to_string(), "1".to_string())];
        let p2 = vec![("a".to_string(), "2".to_string())];
        assert_ne!(
            cache_key("https://api.example.com", Some(&p1)),
            cache_key("https://api.example.com", Some(&p2))
        );
        assert_ne!(
            cache_key("https://api.example.com/x", None),
            cache_key("https://api.example.com/y", None)
        );
    }

    #[test]
    fn key_is_fixed_length_hex() {
        let key = cache_key("https://x/data", None);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
