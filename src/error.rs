// Error types module

use std::fmt;

/// Document store error
///
/// The document store is the source of truth for the catalog; its failures
/// are the one class of error this crate lets propagate to the caller.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Query against the store failed (network, driver, malformed filter)
    Query(String),

    /// Store is unreachable
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Query(msg) => write!(f, "Document store query error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "Document store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Search index error
///
/// Always caught at the search-router or index-sync boundary and converted
/// into a fallback or a logged skip. Never surfaced to request handlers.
#[derive(Debug, Clone)]
pub enum SearchError {
    /// Index query failed
    Query(String),

    /// Index write (single or bulk) failed
    Write(String),

    /// Index is not reachable
    Unavailable(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Query(msg) => write!(f, "Search index query error: {}", msg),
            SearchError::Write(msg) => write!(f, "Search index write error: {}", msg),
            SearchError::Unavailable(msg) => write!(f, "Search index unavailable: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_includes_context() {
        let err = StoreError::Query("bad filter".to_string());
        assert!(format!("{}", err).contains("bad filter"));

        let err = StoreError::Unavailable("connection refused".to_string());
        assert!(format!("{}", err).contains("connection refused"));
    }

    #[test]
    fn test_search_error_display_includes_context() {
        let err = SearchError::Query("malformed query".to_string());
        assert!(format!("{}", err).contains("malformed query"));

        let err = SearchError::Write("bulk rejected".to_string());
        assert!(format!("{}", err).contains("bulk rejected"));
    }

    #[test]
    fn test_errors_implement_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<StoreError>();
        assert_error::<SearchError>();
    }
}
