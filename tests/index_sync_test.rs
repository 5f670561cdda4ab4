// Index-sync integration tests
//
// Exercises the full reindex flow, including per-batch failure resilience
// against a deliberately flaky index.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::product;
use kaimono::catalog::{IndexDocument, MemoryCatalog};
use kaimono::error::SearchError;
use kaimono::search::{IndexPage, IndexQuery, IndexSync, MemoryIndex, ReindexReport, SearchIndex};

/// Index double whose Nth bulk call fails (1-indexed)
struct FlakyIndex {
    inner: MemoryIndex,
    failing_call: usize,
    bulk_calls: AtomicUsize,
}

impl FlakyIndex {
    fn failing_on(call: usize) -> Self {
        Self {
            inner: MemoryIndex::new(),
            failing_call: call,
            bulk_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SearchIndex for FlakyIndex {
    async fn search(&self, query: &IndexQuery) -> Result<IndexPage, SearchError> {
        self.inner.search(query).await
    }

    async fn put(&self, doc: &IndexDocument) -> Result<(), SearchError> {
        self.inner.put(doc).await
    }

    async fn remove(&self, id: &str) -> Result<(), SearchError> {
        self.inner.remove(id).await
    }

    async fn bulk_put(&self, docs: &[IndexDocument]) -> Result<(), SearchError> {
        let call = self.bulk_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.failing_call {
            return Err(SearchError::Write("bulk rejected by index".to_string()));
        }
        self.inner.bulk_put(docs).await
    }

    async fn ensure_ready(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

fn catalog_of(n: usize) -> Arc<MemoryCatalog> {
    let products = (0..n)
        .map(|i| product(&format!("p{:03}", i), &format!("Product {:03}", i), 10.0, 1))
        .collect();
    Arc::new(MemoryCatalog::with_products(products))
}

#[tokio::test]
async fn test_reindex_continues_past_failing_batch() {
    // Test: 250 products, one batch of 100 failing ->
    // {indexed: 150, failed: 100}, no error
    let store = catalog_of(250);
    let index = Arc::new(FlakyIndex::failing_on(2));
    let sync = IndexSync::with_batch_size(store, Some(index.clone()), 100);

    let report = sync.reindex_all().await.unwrap();
    assert_eq!(
        report,
        ReindexReport {
            indexed: 150,
            failed: 100
        }
    );

    // The two healthy batches landed
    assert_eq!(index.inner.len(), 150);
}

#[tokio::test]
async fn test_reindex_all_healthy_indexes_everything() {
    let store = catalog_of(250);
    let index = Arc::new(MemoryIndex::new());
    let sync = IndexSync::with_batch_size(store, Some(index.clone()), 100);

    let report = sync.reindex_all().await.unwrap();
    assert_eq!(
        report,
        ReindexReport {
            indexed: 250,
            failed: 0
        }
    );
    assert_eq!(index.len(), 250);
}

#[tokio::test]
async fn test_reindex_exact_batch_multiple() {
    // Catalog size landing exactly on a batch boundary must not loop forever
    // or double-count
    let store = catalog_of(200);
    let index = Arc::new(MemoryIndex::new());
    let sync = IndexSync::with_batch_size(store, Some(index.clone()), 100);

    let report = sync.reindex_all().await.unwrap();
    assert_eq!(report.indexed, 200);
    assert_eq!(index.len(), 200);
}

#[tokio::test]
async fn test_single_document_lifecycle_reaches_searchability() {
    let store = Arc::new(MemoryCatalog::new());
    let index = Arc::new(MemoryIndex::new());
    let sync = IndexSync::new(store.clone(), Some(index.clone()));

    let p = product("a", "Gaming Laptop", 1500.0, 1);
    store.upsert(p.clone());
    assert!(sync.index_one(&p).await);

    let page = index
        .search(&IndexQuery {
            text: "laptop".to_string(),
            category: None,
            price_min: None,
            price_max: None,
            featured: None,
            brands: vec![],
            sort: kaimono::search::IndexSort::Relevance,
            from: 0,
            size: 10,
        })
        .await
        .unwrap();
    assert_eq!(page.ids, vec!["a"]);

    assert!(sync.remove_one("a").await);
    assert!(!index.contains("a"));
}
