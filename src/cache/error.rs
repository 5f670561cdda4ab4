//! Cache error types
//!
//! This module defines error types for cache operations. Every error here is
//! best-effort territory: callers log and degrade, they never fail a request
//! because of the cache.

/// Cache error types
#[derive(Debug)]
pub enum CacheError {
    /// Redis connection failed
    ConnectionFailed(String),
    /// Backend operation error (GET/SET/DEL/KEYS)
    Backend(String),
    /// Configuration error
    ConfigurationError(String),
    /// Serialization/deserialization error
    SerializationError(String),
    /// Invalid cache key (null bytes, oversized)
    InvalidKey(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::ConnectionFailed(msg) => write!(f, "Cache connection failed: {}", msg),
            CacheError::Backend(msg) => write!(f, "Cache backend error: {}", msg),
            CacheError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CacheError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            CacheError::InvalidKey(msg) => write!(f, "Invalid cache key: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::SerializationError(err.to_string())
    }
}
