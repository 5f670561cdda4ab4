// Configuration module

use std::path::Path;

use serde::{Deserialize, Serialize};

mod cache;
mod search;

pub use cache::{CacheConfig, ConnectRetryConfig};
pub use search::SearchConfig;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a YAML file and validate it
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config file {}: {}", path.display(), e))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| format!("Invalid config YAML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), String> {
        self.cache.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.search.reindex_batch_size, 100);
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
cache:
  redis_url: "redis://cache.internal:6379"
  list_ttl_seconds: 60
search:
  reindex_batch_size: 500
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.cache.redis_url,
            Some("redis://cache.internal:6379".to_string())
        );
        assert_eq!(config.cache.list_ttl_seconds, 60);
        assert_eq!(config.search.reindex_batch_size, 500);
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let result = Config::from_yaml("cache: [not, a, map]");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid config YAML"));
    }

    #[test]
    fn test_validation_failure_propagates() {
        let yaml = r#"
search:
  max_page_size: 0
"#;
        let result = Config::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("max_page_size"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = Config::from_file(Path::new("/nonexistent/kaimono.yaml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("/nonexistent/kaimono.yaml"));
    }
}
