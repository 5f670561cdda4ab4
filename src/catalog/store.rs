//! Document store trait definition
//!
//! The document store is the primary catalog storage and the source of truth.
//! The actual engine (a document database reached through its driver) lives
//! outside this crate; implementations adapt this trait to it. The in-memory
//! `MemoryCatalog` implementation backs tests and single-node development.

use async_trait::async_trait;

use crate::error::StoreError;

use super::filter::{ProductFilter, ProductSort};
use super::product::Product;

/// Primary catalog storage
///
/// Filter semantics are defined on `ProductFilter`; every implementation must
/// honor them identically so the search fallback path is deterministic across
/// backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Query products matching the filter, ordered by `sort`, with
    /// skip/limit pagination applied after ordering.
    async fn find_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError>;

    /// Count of all products matching the filter, ignoring pagination
    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    /// Fetch canonical records for an ID set.
    ///
    /// Returns records in the store's natural order, NOT the order of `ids`;
    /// IDs with no backing record are silently absent. Callers needing a
    /// specific order (the search router's index path) must reorder.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, StoreError>;
}
