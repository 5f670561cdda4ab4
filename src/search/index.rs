//! Search index trait definition
//!
//! The dedicated search index is an optional, derived view of the catalog.
//! Implementations adapt this trait to the index engine's own query DSL; the
//! trait keeps the rest of the crate backend-agnostic.
//!
//! Ranking contract every implementation must honor for `Relevance`:
//! boosted multi-field match with `name` weighted highest (3.0),
//! `description` next (2.0), `category` lowest (1.0), fuzzy/partial matching
//! on the text term.

use async_trait::async_trait;

use crate::catalog::IndexDocument;
use crate::error::SearchError;

/// Field boost for product names
pub const NAME_WEIGHT: f32 = 3.0;
/// Field boost for product descriptions
pub const DESCRIPTION_WEIGHT: f32 = 2.0;
/// Field boost for product categories
pub const CATEGORY_WEIGHT: f32 = 1.0;

/// Ordering executed by the index engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSort {
    /// No explicit sort; defer to the engine's native scoring
    Relevance,
    Newest,
    PriceAsc,
    PriceDesc,
    Popular,
}

/// Backend-neutral index query
///
/// The text term is combined via AND with the hard filters: category
/// exact-match, price range, featured flag, and brand prefix-match over the
/// name field OR'd across the brand list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    pub text: String,
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub featured: Option<bool>,
    pub brands: Vec<String>,
    pub sort: IndexSort,
    /// Pagination offset: (page - 1) * limit
    pub from: u64,
    pub size: u64,
}

/// One page of matches: ranked document IDs plus the overall match count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    /// Matched document IDs in ranking order
    pub ids: Vec<String>,
    /// Total matches across all pages
    pub total: u64,
}

/// Dedicated search index over the product catalog
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Execute a ranked query, returning matched IDs in ranking order
    async fn search(&self, query: &IndexQuery) -> Result<IndexPage, SearchError>;

    /// Create or overwrite one document
    async fn put(&self, doc: &IndexDocument) -> Result<(), SearchError>;

    /// Delete one document by ID. Deleting an absent document is success.
    async fn remove(&self, id: &str) -> Result<(), SearchError>;

    /// Create or overwrite a batch of documents in one call
    async fn bulk_put(&self, docs: &[IndexDocument]) -> Result<(), SearchError>;

    /// Ensure the backing index/mapping exists (create if missing)
    async fn ensure_ready(&self) -> Result<(), SearchError>;
}
