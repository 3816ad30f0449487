//! Caching wrapper around the resilient API client.

use krestate_api::{FetchError, OpenDataClient};
use serde_json::Value;

use crate::cache::{cache_key, ApiCache, CacheStats};

/// API client wrapper that consults the TTL cache before the network.
///
/// Cache hits return without touching the network or the circuit breaker.
/// On a miss the inner client performs the fetch; only successful bodies
/// are stored, so a transient failure never suppresses a legitimate retry
/// on the next request.
pub struct CachedClient {
    inner: OpenDataClient,
    cache: ApiCache,
}

impl CachedClient {
    /// Create a cached client over a default [`OpenDataClient`].
    pub fn new(cache: ApiCache) -> Result<Self, FetchError> {
        Ok(Self {
            inner: OpenDataClient::new()?,
            cache,
        })
    }

    /// Create a cached client over a custom inner client. Used for testing
    /// with short timeouts.
    pub fn with_client(inner: OpenDataClient, cache: ApiCache) -> Self {
        Self { inner, cache }
    }

    /// Fetch a URL as text with caching. `key_params` participate in cache
    /// key derivation only; the URL is fetched as given.
    pub async fn fetch_text(
        &self,
        url: &str,
        key_params: Option<&[(String, String)]>,
    ) -> Result<String, FetchError> {
        let key = cache_key(url, key_params);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(cache_key = &key[..16], url, "cache hit");
            return Ok(cached);
        }
        tracing::debug!(cache_key = &key[..16], url, "cache miss");

        let body = self.inner.fetch_text(url).await?;
        self.cache.set(key.clone(), body.clone());
        tracing::debug!(cache_key = &key[..16], url, "response cached");
        Ok(body)
    }

    /// Fetch a URL as decoded JSON with caching.
    pub async fn fetch_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        key_params: Option<&[(String, String)]>,
    ) -> Result<Value, FetchError> {
        let key = cache_key(url, key_params);
        if let Some(cached) = self.cache.get(&key) {
            match serde_json::from_str(&cached) {
                Ok(value) => {
                    tracing::debug!(cache_key = &key[..16], url, "cache hit");
                    return Ok(value);
                }
                // An unreadable entry is dropped and refetched.
                Err(_) => self.cache.delete(&key),
            }
        }
        tracing::debug!(cache_key = &key[..16], url, "cache miss");

        let value = self.inner.fetch_json(url, headers).await?;
        if let Ok(serialized) = serde_json::to_string(&value) {
            self.cache.set(key, serialized);
            tracing::debug!(url, "response cached");
        }
        Ok(value)
    }

    /// The inner resilient client.
    pub fn client(&self) -> &OpenDataClient {
        &self.inner
    }

    /// Cache lookup statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The underlying cache.
    pub fn cache(&self) -> &ApiCache {
        &self.cache
    }

    /// Remove all cached entries.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
