// Cache facade
//
// Best-effort read-through/write-through memoization of JSON-serializable
// response payloads. The facade is usable even when Redis was never reached
// at startup: every operation degrades to a no-op and the primary data path
// proceeds uncached. No caller ever fails a request because of the cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::singleflight::{FlightSlot, Singleflight};
use super::stats::{CacheStats, CacheStatsTracker};
use super::store::VolatileStore;

/// Per-call cache options
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Per-entry expiry
    pub ttl: Duration,
    /// Optional key namespace; the stored key becomes "{prefix}:{key}"
    pub prefix: Option<String>,
}

impl CacheOptions {
    pub fn ttl(ttl: Duration) -> Self {
        Self { ttl, prefix: None }
    }

    pub fn with_prefix(ttl: Duration, prefix: &str) -> Self {
        Self {
            ttl,
            prefix: Some(prefix.to_string()),
        }
    }
}

/// Read-through cache over an optional volatile store
///
/// Constructed with `None` when the store could not be reached at boot; the
/// facade then behaves as permanently disabled with no caller-visible state
/// change.
pub struct CacheFacade {
    store: Option<Arc<dyn VolatileStore>>,
    inflight: Singleflight,
    stats: Arc<CacheStatsTracker>,
    default_ttl: Duration,
}

impl CacheFacade {
    pub fn new(store: Option<Arc<dyn VolatileStore>>, default_ttl: Duration) -> Self {
        Self {
            store,
            inflight: Singleflight::new(),
            stats: Arc::new(CacheStatsTracker::new()),
            default_ttl,
        }
    }

    /// Facade with caching permanently disabled
    pub fn disabled() -> Self {
        Self::new(None, Duration::from_secs(3600))
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Look up a cached value.
    ///
    /// Returns `None` when the store is disabled, the key is absent or
    /// expired, the store call fails, or the stored payload does not
    /// deserialize. None of these conditions propagate.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key).await?;

        match serde_json::from_str(&raw) {
            Ok(value) => {
                self.stats.increment_hits();
                Some(value)
            }
            Err(e) => {
                // Malformed stored data is a miss, never an error
                tracing::warn!(key, error = %e, "Discarding malformed cache entry");
                self.stats.increment_misses();
                None
            }
        }
    }

    /// Store a value under the key with the given TTL.
    ///
    /// Returns `false` on any failure (store disabled, serialization failure,
    /// backend error). Callers must treat caching as optional.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, options: &CacheOptions) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value for cache");
                self.stats.increment_errors();
                return false;
            }
        };

        let full_key = compose_key(options.prefix.as_deref(), key);
        match store.set(&full_key, &payload, options.ttl).await {
            Ok(()) => {
                self.stats.increment_sets();
                true
            }
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Cache write failed");
                self.stats.increment_errors();
                false
            }
        }
    }

    /// Remove a single entry. Best-effort; returns whether an entry was removed.
    pub async fn delete(&self, key: &str, prefix: Option<&str>) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        let full_key = compose_key(prefix, key);
        match store.del(&[full_key.clone()]).await {
            Ok(deleted) => deleted > 0,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Cache delete failed");
                self.stats.increment_errors();
                false
            }
        }
    }

    /// Invalidate every key matching a glob pattern (e.g. "products:*").
    ///
    /// This is the invalidation primitive: product-mutation code calls it
    /// after a write that would stale existing entries. Returns the number of
    /// entries removed; 0 when the store is unavailable or nothing matched.
    pub async fn delete_pattern(&self, pattern: &str) -> u64 {
        let Some(store) = &self.store else {
            return 0;
        };

        let keys = match store.keys(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Cache key scan failed");
                self.stats.increment_errors();
                return 0;
            }
        };

        if keys.is_empty() {
            return 0;
        }

        match store.del(&keys).await {
            Ok(deleted) => {
                self.stats.increment_invalidations(deleted);
                tracing::debug!(pattern, deleted, "Invalidated cache entries");
                deleted
            }
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Cache batch delete failed");
                self.stats.increment_errors();
                0
            }
        }
    }

    /// Read-through combinator: on a hit, return the cached value without
    /// running `producer`; on a miss, run `producer`, cache its result, and
    /// return it.
    ///
    /// Concurrent misses for the same key are deduplicated: the first caller
    /// runs the producer while the others wait and then re-read the cache. A
    /// waiter that still misses after the leader finished (cache write failed,
    /// or caching disabled mid-flight) runs its own producer rather than
    /// erroring.
    ///
    /// Producer errors propagate unchanged to the caller and release the key
    /// for the next waiter.
    pub async fn with_cache<T, E, F, Fut>(
        &self,
        key: &str,
        options: &CacheOptions,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.store.is_none() {
            return producer().await;
        }

        let full_key = compose_key(options.prefix.as_deref(), key);

        if let Some(hit) = self.get(&full_key).await {
            return Ok(hit);
        }

        match self.inflight.acquire(&full_key).await {
            FlightSlot::Leader(guard) => {
                let result = producer().await;
                if let Ok(value) = &result {
                    // Write through under the bare key; the prefix is already
                    // part of full_key
                    self.set(&full_key, value, &CacheOptions::ttl(options.ttl))
                        .await;
                }
                guard.complete().await;
                result
            }
            FlightSlot::Follower => {
                if let Some(hit) = self.get(&full_key).await {
                    return Ok(hit);
                }
                // Leader did not populate the cache; compute independently
                producer().await
            }
        }
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        let store = self.store.as_ref()?;

        match store.get(key).await {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => {
                self.stats.increment_misses();
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed");
                self.stats.increment_errors();
                None
            }
        }
    }
}

fn compose_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, key),
        None => key.to_string(),
    }
}
