// Search configuration module

use serde::{Deserialize, Serialize};

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Products streamed per bulk batch during a full reindex (default: 100)
    #[serde(default = "default_reindex_batch_size")]
    pub reindex_batch_size: u64,

    /// Upper clamp on the per-page result count (default: 100)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            reindex_batch_size: default_reindex_batch_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_reindex_batch_size() -> u64 {
    100
}

fn default_max_page_size() -> u32 {
    100
}

impl SearchConfig {
    /// Validate search configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.reindex_batch_size == 0 {
            return Err("reindex_batch_size must be at least 1".to_string());
        }
        if self.max_page_size == 0 {
            return Err("max_page_size must be at least 1".to_string());
        }
        Ok(())
    }
}
