// Index-sync helper
//
// Keeps the dedicated search index eventually consistent with the document
// store without coupling catalog-write latency to indexing latency. There is
// no retry queue: a failed single-document sync is lost until the next full
// reindex or until the product is mutated again.

use std::sync::Arc;

use crate::catalog::{DocumentStore, IndexDocument, Product, ProductFilter, ProductSort};
use crate::error::StoreError;

use super::index::SearchIndex;

/// Default number of products streamed per reindex batch
pub const DEFAULT_REINDEX_BATCH_SIZE: u64 = 100;

/// Counters accumulated across a full reindex run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReindexReport {
    pub indexed: u64,
    pub failed: u64,
}

/// Write-side bridge between the document store and the search index
pub struct IndexSync {
    store: Arc<dyn DocumentStore>,
    index: Option<Arc<dyn SearchIndex>>,
    batch_size: u64,
}

impl IndexSync {
    pub fn new(store: Arc<dyn DocumentStore>, index: Option<Arc<dyn SearchIndex>>) -> Self {
        Self::with_batch_size(store, index, DEFAULT_REINDEX_BATCH_SIZE)
    }

    pub fn with_batch_size(
        store: Arc<dyn DocumentStore>,
        index: Option<Arc<dyn SearchIndex>>,
        batch_size: u64,
    ) -> Self {
        Self {
            store,
            index,
            batch_size: batch_size.max(1),
        }
    }

    /// Upsert one product's projection into the index.
    ///
    /// Returns `false` when the index is not wired or the write failed; a
    /// failure is logged, never thrown, and must not block the catalog write
    /// that triggered it.
    pub async fn index_one(&self, product: &Product) -> bool {
        let Some(index) = &self.index else {
            return false;
        };

        match index.put(&IndexDocument::from(product)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    product_id = %product.id,
                    error = %e,
                    "Failed to index product, index will converge on next reindex"
                );
                false
            }
        }
    }

    /// Delete one product's projection from the index by ID. Idempotent:
    /// removing an ID the index never held reports success.
    pub async fn remove_one(&self, product_id: &str) -> bool {
        let Some(index) = &self.index else {
            return false;
        };

        match index.remove(product_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(product_id, error = %e, "Failed to remove product from index");
                false
            }
        }
    }

    /// Full rebuild: stream every product from the document store in fixed
    /// batches and bulk-upsert each batch.
    ///
    /// Per-batch failures are counted and skipped, never aborting the run.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only when the document store itself fails: the
    /// source of truth being unreadable is fatal to the run.
    pub async fn reindex_all(&self) -> Result<ReindexReport, StoreError> {
        let Some(index) = &self.index else {
            tracing::warn!("Reindex requested but no search index is wired, skipping");
            return Ok(ReindexReport::default());
        };

        let mut report = ReindexReport::default();
        let mut skip: u64 = 0;
        let mut ensured = false;

        loop {
            let batch = self
                .store
                .find_products(&ProductFilter::all(), ProductSort::Newest, skip, self.batch_size)
                .await?;
            if batch.is_empty() {
                break;
            }

            if !ensured {
                if let Err(e) = index.ensure_ready().await {
                    // Bulk writes will fail per batch and be counted below
                    tracing::warn!(error = %e, "Could not ensure index mapping before reindex");
                }
                ensured = true;
            }

            let docs: Vec<IndexDocument> = batch.iter().map(IndexDocument::from).collect();
            let count = docs.len() as u64;

            match index.bulk_put(&docs).await {
                Ok(()) => report.indexed += count,
                Err(e) => {
                    report.failed += count;
                    tracing::warn!(
                        batch_start = skip,
                        batch_len = count,
                        error = %e,
                        "Bulk index batch failed, continuing with next batch"
                    );
                }
            }

            skip += count;
            if count < self.batch_size {
                break;
            }
        }

        tracing::info!(
            indexed = report.indexed,
            failed = report.failed,
            "Reindex complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::search::memory::MemoryIndex;
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            category: "Electronics".to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            sku: format!("SKU-{}", id),
            price: 100.0,
            original_price: None,
            rating: 4.0,
            review_count: 10,
            stock: 5,
            featured: false,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_index_one_upserts_projection() {
        let store = Arc::new(MemoryCatalog::new());
        let index = Arc::new(MemoryIndex::new());
        let sync = IndexSync::new(store, Some(index.clone()));

        assert!(sync.index_one(&product("a", "Gaming Laptop")).await);
        assert!(index.contains("a"));
    }

    #[tokio::test]
    async fn test_index_one_without_index_is_noop() {
        let store = Arc::new(MemoryCatalog::new());
        let sync = IndexSync::new(store, None);

        assert!(!sync.index_one(&product("a", "Gaming Laptop")).await);
    }

    #[tokio::test]
    async fn test_remove_one_is_idempotent() {
        let store = Arc::new(MemoryCatalog::new());
        let index = Arc::new(MemoryIndex::new());
        let sync = IndexSync::new(store, Some(index.clone()));

        sync.index_one(&product("a", "Gaming Laptop")).await;
        assert!(sync.remove_one("a").await);
        assert!(!index.contains("a"));
        // Never held or already gone: still success
        assert!(sync.remove_one("a").await);
        assert!(sync.remove_one("never-existed").await);
    }

    #[tokio::test]
    async fn test_reindex_all_streams_every_product() {
        let store = Arc::new(MemoryCatalog::new());
        for i in 0..25 {
            store.upsert(product(&format!("p{}", i), &format!("Product {}", i)));
        }
        let index = Arc::new(MemoryIndex::new());
        let sync = IndexSync::with_batch_size(store, Some(index.clone()), 10);

        let report = sync.reindex_all().await.unwrap();
        assert_eq!(report, ReindexReport { indexed: 25, failed: 0 });
        assert_eq!(index.len(), 25);
    }

    #[tokio::test]
    async fn test_reindex_all_empty_catalog_touches_nothing() {
        let store = Arc::new(MemoryCatalog::new());
        let index = Arc::new(MemoryIndex::new());
        let sync = IndexSync::new(store, Some(index.clone()));

        let report = sync.reindex_all().await.unwrap();
        assert_eq!(report, ReindexReport::default());
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_reindex_all_without_index_reports_zero() {
        let store = Arc::new(MemoryCatalog::new());
        store.upsert(product("a", "Gaming Laptop"));
        let sync = IndexSync::new(store, None);

        let report = sync.reindex_all().await.unwrap();
        assert_eq!(report, ReindexReport::default());
    }

    #[test]
    fn test_batch_size_floor_is_one() {
        let store = Arc::new(MemoryCatalog::new());
        let sync = IndexSync::with_batch_size(store, None, 0);
        assert_eq!(sync.batch_size, 1);
    }
}
