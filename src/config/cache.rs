// Cache configuration module

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cache configuration
///
/// Covers the Redis connection, the key namespace, and the per-endpoint-class
/// TTL defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether response caching is attempted at all (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Key prefix for cache entries (default: "kaimono")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Default TTL for cache entries in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// TTL for list-endpoint entries in seconds (default: 300 = 5 minutes)
    #[serde(default = "default_list_ttl_seconds")]
    pub list_ttl_seconds: u64,

    /// TTL for single-entity entries in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_entity_ttl_seconds")]
    pub entity_ttl_seconds: u64,

    /// Boot-time connection attempt policy
    #[serde(default)]
    pub connect: ConnectRetryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            redis_url: None,
            key_prefix: default_key_prefix(),
            default_ttl_seconds: default_default_ttl_seconds(),
            list_ttl_seconds: default_list_ttl_seconds(),
            entity_ttl_seconds: default_entity_ttl_seconds(),
            connect: ConnectRetryConfig::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_key_prefix() -> String {
    "kaimono".to_string()
}

fn default_default_ttl_seconds() -> u64 {
    3600 // 1 hour
}

fn default_list_ttl_seconds() -> u64 {
    300 // 5 minutes
}

fn default_entity_ttl_seconds() -> u64 {
    3600 // 1 hour
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_ttl_seconds)
    }

    pub fn entity_ttl(&self) -> Duration {
        Duration::from_secs(self.entity_ttl_seconds)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_ttl_seconds == 0 || self.list_ttl_seconds == 0 || self.entity_ttl_seconds == 0
        {
            return Err("cache TTLs must be positive".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("key_prefix cannot be empty".to_string());
        }
        self.connect.validate()
    }
}

/// Boot-time Redis connection attempt policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRetryConfig {
    /// Maximum connection attempts before caching is disabled (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff between attempts in milliseconds (default: 200)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff cap in milliseconds (default: 2000)
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Per-attempt connection timeout in milliseconds (default: 5000)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ConnectRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    2000
}

fn default_connect_timeout_ms() -> u64 {
    5000 // 5 seconds
}

impl ConnectRetryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("connect.max_attempts must be at least 1".to_string());
        }
        if self.connect_timeout_ms == 0 {
            return Err("connect.connect_timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}
