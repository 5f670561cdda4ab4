// Redis-backed volatile store
//
// Provides distributed response caching using Redis with production-ready
// error handling. Connection establishment happens once at process startup
// with a bounded timeout and capped, backed-off attempts; if the cap is
// reached the process runs with caching disabled.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::config::CacheConfig;
use crate::retry::RetryPolicy;

use super::error::CacheError;
use super::key::validate_key;
use super::store::VolatileStore;

/// Redis-based volatile store
///
/// Wraps an async, multiplexed `ConnectionManager` shared by all in-flight
/// requests. The manager handles reconnection internally after the initial
/// connection succeeds.
#[derive(Debug)]
pub struct RedisStore {
    /// Redis connection manager (async, multiplexed)
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis using the cache configuration.
    ///
    /// Attempts are capped at `connect.max_attempts` with exponential backoff
    /// between them and a per-attempt timeout of `connect.connect_timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConfigurationError` if no `redis_url` is set, or
    /// `CacheError::ConnectionFailed` once the attempt cap is exhausted. The
    /// caller is expected to log the failure once and construct the cache
    /// facade disabled.
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let redis_url = config.redis_url.as_ref().ok_or_else(|| {
            CacheError::ConfigurationError("redis_url is required".to_string())
        })?;

        let client = Client::open(redis_url.as_str()).map_err(|e| {
            CacheError::ConnectionFailed(format!("Invalid Redis URL: {}", e))
        })?;

        let policy = RetryPolicy::new(
            config.connect.max_attempts,
            config.connect.initial_backoff_ms,
            config.connect.max_backoff_ms,
        );
        let per_attempt = Duration::from_millis(config.connect.connect_timeout_ms);

        let mut attempt: u32 = 0;
        loop {
            let outcome =
                tokio::time::timeout(per_attempt, ConnectionManager::new(client.clone())).await;

            let last_error = match outcome {
                Ok(Ok(connection)) => return Ok(Self { connection }),
                Ok(Err(e)) => format!("Failed to connect to Redis: {}", e),
                Err(_) => format!(
                    "Redis connection attempt timed out after {}ms",
                    config.connect.connect_timeout_ms
                ),
            };

            if !policy.should_retry(attempt) {
                return Err(CacheError::ConnectionFailed(last_error));
            }

            attempt += 1;
            let backoff = policy.backoff_duration(attempt);
            tracing::warn!(
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %last_error,
                "Redis connection attempt failed, retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

#[async_trait]
impl VolatileStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        validate_key(key)?;

        let mut conn = self.connection.clone();
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Backend(format!("GET {}: {}", key, e)))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        validate_key(key)?;

        // SETEX requires a positive expiry
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Backend(format!("SETEX {}: {}", key, e)))?;
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: u64 = conn
            .del(keys.to_vec())
            .await
            .map_err(|e| CacheError::Backend(format!("DEL: {}", e)))?;
        Ok(deleted)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn
            .keys(pattern)
            .await
            .map_err(|e| CacheError::Backend(format!("KEYS {}: {}", pattern, e)))?;
        Ok(keys)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Backend(format!("PING: {}", e)))?;
        Ok(())
    }
}

// Verify Send + Sync bounds (required for async trait)
fn _assert_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    assert_send::<RedisStore>();
    assert_sync::<RedisStore>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    #[tokio::test]
    async fn test_connect_requires_redis_url() {
        let config = CacheConfig::default();
        assert!(config.redis_url.is_none());

        let result = RedisStore::connect(&config).await;
        assert!(result.is_err());
        match result.unwrap_err() {
            CacheError::ConfigurationError(msg) => assert!(msg.contains("redis_url")),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let config = CacheConfig {
            redis_url: Some("not a url".to_string()),
            ..Default::default()
        };

        let result = RedisStore::connect(&config).await;
        assert!(result.is_err());
        match result.unwrap_err() {
            CacheError::ConnectionFailed(msg) => assert!(msg.contains("Invalid Redis URL")),
            other => panic!("Expected ConnectionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_redis_store_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<RedisStore>();
        assert_sync::<RedisStore>();
    }
}
