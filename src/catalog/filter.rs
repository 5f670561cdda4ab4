// Document-store filter semantics
//
// A `ProductFilter` is the backend-neutral representation of the fallback
// query path. Every `DocumentStore` implementation interprets it with the
// same semantics:
// - `category`: case-insensitive substring match
// - `text`: the store's native text search across name and description
// - `price_min`/`price_max`, `featured`: direct field comparisons
// - `brands`: case-insensitive prefix match against the product name,
//   anchored to a word boundary, OR'd across the list and AND-combined with
//   the text clause

use regex::Regex;

use super::query::{SearchQuery, SortMode};

/// Backend-neutral product filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub text: Option<String>,
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub featured: Option<bool>,
    pub brands: Vec<String>,
}

impl ProductFilter {
    /// Filter matching the whole catalog
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&SearchQuery> for ProductFilter {
    fn from(query: &SearchQuery) -> Self {
        Self {
            text: query.text_term().map(str::to_string),
            category: query.category.clone(),
            price_min: query.price_min,
            price_max: query.price_max,
            featured: query.featured,
            brands: query.brands.clone(),
        }
    }
}

/// Result ordering a document store can execute directly
///
/// `Relevance` has no meaning here; the router degrades it to `Newest`
/// before the filter reaches a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    Newest,
    PriceAsc,
    PriceDesc,
    Popular,
}

impl From<SortMode> for ProductSort {
    fn from(mode: SortMode) -> Self {
        match mode {
            SortMode::PriceAsc => ProductSort::PriceAsc,
            SortMode::PriceDesc => ProductSort::PriceDesc,
            SortMode::Popular => ProductSort::Popular,
            // The store has no relevance scoring; degrade silently
            SortMode::Newest | SortMode::Relevance => ProductSort::Newest,
        }
    }
}

/// Compiles the word-boundary brand pattern for a user-supplied brand token.
///
/// Regex metacharacters in the token are escaped before the pattern is built,
/// so strings like "C++" or "A*Star" match literally. The pattern anchors the
/// brand at the start of the name, followed by whitespace or end-of-string.
pub fn brand_regex(brand: &str) -> Option<Regex> {
    let token = brand.trim();
    if token.is_empty() {
        return None;
    }

    let pattern = format!(r"(?i)^{}(\s|$)", regex::escape(token));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(brand = token, error = %e, "Failed to compile brand pattern");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_query_copies_clauses() {
        let query = SearchQuery {
            text: Some(" laptop ".to_string()),
            category: Some("Electronics".to_string()),
            price_min: Some(100.0),
            price_max: Some(2000.0),
            featured: Some(true),
            brands: vec!["Apple".to_string()],
            ..Default::default()
        };

        let filter = ProductFilter::from(&query);
        assert_eq!(filter.text.as_deref(), Some("laptop"));
        assert_eq!(filter.category.as_deref(), Some("Electronics"));
        assert_eq!(filter.price_min, Some(100.0));
        assert_eq!(filter.price_max, Some(2000.0));
        assert_eq!(filter.featured, Some(true));
        assert_eq!(filter.brands, vec!["Apple".to_string()]);
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(ProductFilter::all().is_empty());
        assert!(!ProductFilter {
            featured: Some(true),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_relevance_degrades_to_newest() {
        assert_eq!(ProductSort::from(SortMode::Relevance), ProductSort::Newest);
        assert_eq!(ProductSort::from(SortMode::Newest), ProductSort::Newest);
        assert_eq!(ProductSort::from(SortMode::PriceAsc), ProductSort::PriceAsc);
        assert_eq!(ProductSort::from(SortMode::Popular), ProductSort::Popular);
    }

    #[test]
    fn test_brand_regex_matches_word_boundary_prefix() {
        let re = brand_regex("Apple").unwrap();
        assert!(re.is_match("Apple iPhone 15"));
        assert!(re.is_match("Apple"));
        assert!(re.is_match("apple watch")); // case-insensitive
        assert!(!re.is_match("Applesauce Maker"));
        assert!(!re.is_match("Green Apple"));
    }

    #[test]
    fn test_brand_regex_escapes_metacharacters() {
        // "C++" must match literally, not as a malformed pattern
        let re = brand_regex("C++").unwrap();
        assert!(re.is_match("C++ Compiler Toolkit"));
        assert!(!re.is_match("C Compiler Toolkit"));

        let re = brand_regex("A*Star").unwrap();
        assert!(re.is_match("A*Star Headphones"));
        assert!(!re.is_match("AStar Headphones"));
    }

    #[test]
    fn test_brand_regex_rejects_blank_tokens() {
        assert!(brand_regex("").is_none());
        assert!(brand_regex("   ").is_none());
    }
}
