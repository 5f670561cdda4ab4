// Search router
//
// Picks the best available backend per request, masks backend query-DSL
// differences, and guarantees the caller receives full canonical entities in
// the executing backend's ranking order.
//
// Routing policy:
// - Index path: only when the dedicated index is wired AND the query carries
//   a free-text term. Pure filter browsing always uses the document store.
// - Any failure on the index path (including the canonical re-fetch) falls
//   back to the document store. Only a document-store failure on the fallback
//   path propagates; the primary source of truth being broken is the one
//   error this crate does not mask.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{
    DocumentStore, Product, ProductFilter, ProductSort, SearchQuery, SearchResult, SortMode,
};
use crate::error::{SearchError, StoreError};

use super::index::{IndexPage, IndexQuery, IndexSort, SearchIndex};

/// Default clamp for the per-page result count
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Dual-backend product search
pub struct SearchRouter {
    store: Arc<dyn DocumentStore>,
    index: Option<Arc<dyn SearchIndex>>,
    max_page_size: u32,
}

impl SearchRouter {
    pub fn new(store: Arc<dyn DocumentStore>, index: Option<Arc<dyn SearchIndex>>) -> Self {
        Self::with_max_page_size(store, index, DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn with_max_page_size(
        store: Arc<dyn DocumentStore>,
        index: Option<Arc<dyn SearchIndex>>,
        max_page_size: u32,
    ) -> Self {
        Self {
            store,
            index,
            max_page_size,
        }
    }

    /// Execute a search against the best available backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only when the document store itself fails on the
    /// final fallback path.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, StoreError> {
        let query = query.clamped(self.max_page_size);

        if let (Some(index), Some(text)) = (self.index.as_deref(), query.text_term()) {
            match self.search_via_index(index, text, &query).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(
                        text,
                        page = query.page,
                        limit = query.limit,
                        backend = "index",
                        error = %e,
                        "Index search path failed, falling back to document store"
                    );
                }
            }
        }

        self.search_via_store(&query).await
    }

    /// Index path: ranked ID query, then canonical re-fetch in ranking order
    async fn search_via_index(
        &self,
        index: &dyn SearchIndex,
        text: &str,
        query: &SearchQuery,
    ) -> Result<SearchResult, SearchError> {
        let index_query = IndexQuery {
            text: text.to_string(),
            category: query.category.clone(),
            price_min: query.price_min,
            price_max: query.price_max,
            featured: query.featured,
            brands: query.brands.clone(),
            sort: index_sort(query.sort),
            from: query.offset(),
            size: u64::from(query.limit),
        };

        let page = index.search(&index_query).await?;

        // The index holds projections; re-fetch canonical records. The store
        // returns them in natural order, so restore the index ranking.
        let products = self
            .store
            .find_by_ids(&page.ids)
            .await
            .map_err(|e| SearchError::Query(format!("canonical re-fetch failed: {}", e)))?;
        let ordered = reorder_to_ranking(&page, products);

        Ok(SearchResult::assemble(
            ordered,
            page.total,
            query.page,
            query.limit,
        ))
    }

    /// Fallback path: equivalent query against the document store
    async fn search_via_store(&self, query: &SearchQuery) -> Result<SearchResult, StoreError> {
        if query.sort == SortMode::Relevance && query.text_term().is_some() {
            tracing::debug!("Relevance sort degraded to newest on the document-store path");
        }

        let filter = ProductFilter::from(query);
        let sort = ProductSort::from(query.sort);

        let (products, total) = futures::try_join!(
            self.store
                .find_products(&filter, sort, query.offset(), u64::from(query.limit)),
            self.store.count_products(&filter),
        )?;

        Ok(SearchResult::assemble(
            products,
            total,
            query.page,
            query.limit,
        ))
    }
}

fn index_sort(mode: SortMode) -> IndexSort {
    match mode {
        SortMode::Relevance => IndexSort::Relevance,
        SortMode::Newest => IndexSort::Newest,
        SortMode::PriceAsc => IndexSort::PriceAsc,
        SortMode::PriceDesc => IndexSort::PriceDesc,
        SortMode::Popular => IndexSort::Popular,
    }
}

/// Reorders re-fetched canonical records to the index's ranked ID order.
/// IDs the store no longer holds (deleted since indexing) are dropped.
fn reorder_to_ranking(page: &IndexPage, products: Vec<Product>) -> Vec<Product> {
    let mut by_id: HashMap<String, Product> =
        products.into_iter().map(|p| (p.id.clone(), p)).collect();

    page.ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect()
}
