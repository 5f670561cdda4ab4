//! Volatile store trait definition
//!
//! This module defines the `VolatileStore` trait that cache backends must
//! satisfy. The trait provides a common interface over Redis and the
//! in-memory store used in tests and single-process deployments.

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheError;

/// Key/value backend for the cache facade (Redis, in-memory)
///
/// All values are opaque serialized strings; TTL handling is the backend's
/// responsibility. An expired entry must read back as absent.
#[async_trait]
pub trait VolatileStore: Send + Sync {
    /// Get a raw value by key
    /// Returns None if the key is not present or its TTL has elapsed
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Set a raw value with a per-entry TTL
    /// Overwrites any existing entry under the key
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete entries by key
    /// Returns the number of entries that existed and were removed
    async fn del(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// List keys matching a glob pattern (e.g. "products:*")
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Liveness probe against the backend
    async fn ping(&self) -> Result<(), CacheError>;
}
