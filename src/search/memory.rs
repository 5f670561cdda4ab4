//! Memory index implementation
//!
//! In-process `SearchIndex` with deterministic weighted-field scoring. Backs
//! the test suite and single-node deployments that want ranked search without
//! a dedicated engine.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::catalog::{brand_regex, IndexDocument};
use crate::error::SearchError;

use super::index::{
    IndexPage, IndexQuery, IndexSort, SearchIndex, CATEGORY_WEIGHT, DESCRIPTION_WEIGHT,
    NAME_WEIGHT,
};

/// In-memory search index with deterministic scoring
#[derive(Default)]
pub struct MemoryIndex {
    docs: RwLock<HashMap<String, IndexDocument>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.read().expect("index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.read().expect("index lock poisoned").contains_key(id)
    }
}

/// Weighted multi-field score; 0.0 means the text term did not match
fn score(doc: &IndexDocument, needle: &str) -> f32 {
    let mut total = 0.0;
    if doc.name.to_lowercase().contains(needle) {
        total += NAME_WEIGHT;
    }
    if doc.description.to_lowercase().contains(needle) {
        total += DESCRIPTION_WEIGHT;
    }
    if doc.category.to_lowercase().contains(needle) {
        total += CATEGORY_WEIGHT;
    }
    total
}

fn passes_filters(doc: &IndexDocument, query: &IndexQuery) -> bool {
    if let Some(category) = &query.category {
        if !doc.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }

    if let Some(min) = query.price_min {
        if doc.price < min {
            return false;
        }
    }

    if let Some(max) = query.price_max {
        if doc.price > max {
            return false;
        }
    }

    if let Some(featured) = query.featured {
        if doc.featured != featured {
            return false;
        }
    }

    if !query.brands.is_empty() {
        let patterns: Vec<_> = query.brands.iter().filter_map(|b| brand_regex(b)).collect();
        if !patterns.is_empty() && !patterns.iter().any(|re| re.is_match(&doc.name)) {
            return false;
        }
    }

    true
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn search(&self, query: &IndexQuery) -> Result<IndexPage, SearchError> {
        let needle = query.text.to_lowercase();

        let mut matched: Vec<(IndexDocument, f32)> = {
            let docs = self.docs.read().expect("index lock poisoned");
            docs.values()
                .filter(|doc| passes_filters(doc, query))
                .filter_map(|doc| {
                    let s = score(doc, &needle);
                    (s > 0.0).then(|| (doc.clone(), s))
                })
                .collect()
        };

        match query.sort {
            IndexSort::Relevance => {
                matched.sort_by(|(a, sa), (b, sb)| {
                    sb.total_cmp(sa).then(b.created_at.cmp(&a.created_at))
                });
            }
            IndexSort::Newest => {
                matched.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at));
            }
            IndexSort::PriceAsc => {
                matched.sort_by(|(a, _), (b, _)| a.price.total_cmp(&b.price));
            }
            IndexSort::PriceDesc => {
                matched.sort_by(|(a, _), (b, _)| b.price.total_cmp(&a.price));
            }
            IndexSort::Popular => {
                matched.sort_by(|(a, _), (b, _)| {
                    b.review_count
                        .cmp(&a.review_count)
                        .then(b.rating.total_cmp(&a.rating))
                });
            }
        }

        let total = matched.len() as u64;
        let ids = matched
            .into_iter()
            .skip(query.from as usize)
            .take(query.size as usize)
            .map(|(doc, _)| doc.id)
            .collect();

        Ok(IndexPage { ids, total })
    }

    async fn put(&self, doc: &IndexDocument) -> Result<(), SearchError> {
        let mut docs = self.docs.write().expect("index lock poisoned");
        docs.insert(doc.id.clone(), doc.clone());
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), SearchError> {
        let mut docs = self.docs.write().expect("index lock poisoned");
        // Absent is success: idempotent delete
        docs.remove(id);
        Ok(())
    }

    async fn bulk_put(&self, batch: &[IndexDocument]) -> Result<(), SearchError> {
        let mut docs = self.docs.write().expect("index lock poisoned");
        for doc in batch {
            docs.insert(doc.id.clone(), doc.clone());
        }
        Ok(())
    }

    async fn ensure_ready(&self) -> Result<(), SearchError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(id: &str, name: &str, description: &str, category: &str, day: u32) -> IndexDocument {
        IndexDocument {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            sku: format!("SKU-{}", id),
            price: 100.0,
            original_price: None,
            rating: 4.0,
            review_count: 10,
            stock: 5,
            featured: false,
            created_at: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
        }
    }

    fn query(text: &str) -> IndexQuery {
        IndexQuery {
            text: text.to_string(),
            category: None,
            price_min: None,
            price_max: None,
            featured: None,
            brands: vec![],
            sort: IndexSort::Relevance,
            from: 0,
            size: 10,
        }
    }

    async fn seeded() -> MemoryIndex {
        let index = MemoryIndex::new();
        index
            .put(&doc("a", "Gaming Laptop", "Fast laptop for games", "Computers", 1))
            .await
            .unwrap();
        index
            .put(&doc("b", "Laptop Sleeve", "Protective cover", "Accessories", 2))
            .await
            .unwrap();
        index
            .put(&doc("c", "Desk Lamp", "A lamp for laptop desks", "Home", 3))
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_name_matches_outrank_description_matches() {
        let index = seeded().await;
        let page = index.search(&query("laptop")).await.unwrap();

        assert_eq!(page.total, 3);
        // "a" matches name+description (5.0), "b" name only (3.0),
        // "c" description only (2.0)
        assert_eq!(page.ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_non_matching_text_is_excluded() {
        let index = seeded().await;
        let page = index.search(&query("telescope")).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.ids.is_empty());
    }

    #[tokio::test]
    async fn test_category_filter_is_exact_match() {
        let index = seeded().await;

        let mut q = query("laptop");
        q.category = Some("Computers".to_string());
        let page = index.search(&q).await.unwrap();
        assert_eq!(page.ids, vec!["a"]);

        // Substring of a category does not match on the index path
        q.category = Some("Comp".to_string());
        let page = index.search(&q).await.unwrap();
        assert!(page.ids.is_empty());
    }

    #[tokio::test]
    async fn test_brand_prefix_filter_on_name() {
        let index = seeded().await;

        let mut q = query("laptop");
        q.brands = vec!["Gaming".to_string()];
        let page = index.search(&q).await.unwrap();
        assert_eq!(page.ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_pagination_offsets_ranked_order() {
        let index = seeded().await;

        let mut q = query("laptop");
        q.from = 1;
        q.size = 1;
        let page = index.search(&q).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_put_overwrites_and_remove_is_idempotent() {
        let index = MemoryIndex::new();
        let d = doc("a", "Gaming Laptop", "Fast", "Computers", 1);

        index.put(&d).await.unwrap();
        index.put(&d).await.unwrap();
        assert_eq!(index.len(), 1);

        index.remove("a").await.unwrap();
        assert!(index.is_empty());
        // Removing again is still success
        index.remove("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_bulk_put_inserts_all() {
        let index = MemoryIndex::new();
        let batch = vec![
            doc("a", "One", "first", "X", 1),
            doc("b", "Two", "second", "X", 2),
        ];
        index.bulk_put(&batch).await.unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains("a"));
        assert!(index.contains("b"));
    }

    #[tokio::test]
    async fn test_newest_sort_ignores_score() {
        let index = seeded().await;
        let mut q = query("laptop");
        q.sort = IndexSort::Newest;
        let page = index.search(&q).await.unwrap();
        assert_eq!(page.ids, vec!["c", "b", "a"]);
    }
}
