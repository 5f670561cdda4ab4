// Search query and result types

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Requested result ordering
///
/// `Relevance` is only meaningful when a free-text term is present and the
/// search index is reachable; everywhere else it silently degrades to
/// `Newest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Popular,
    Relevance,
}

/// Per-request search parameters, constructed by the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort: SortMode,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            price_min: None,
            price_max: None,
            featured: None,
            brands: Vec::new(),
            page: default_page(),
            limit: default_limit(),
            sort: SortMode::default(),
        }
    }
}

impl SearchQuery {
    /// The free-text term, trimmed; `None` when absent or whitespace-only
    pub fn text_term(&self) -> Option<&str> {
        match self.text.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(term) => Some(term),
        }
    }

    /// Copy of the query with page and limit clamped to sane bounds
    pub fn clamped(&self, max_limit: u32) -> Self {
        let mut query = self.clone();
        query.page = query.page.max(1);
        query.limit = query.limit.clamp(1, max_limit.max(1));
        query
    }

    /// Pagination offset for the executing backend
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Assembled search response
///
/// `products` ordering always matches the ordering produced by whichever
/// backend executed the match.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl SearchResult {
    pub fn assemble(products: Vec<Product>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            products,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// ceil(total / limit); 0 for an empty result set
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let limit = u64::from(limit);
    ((total + limit - 1) / limit) as u32
}
