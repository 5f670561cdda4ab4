//! Memory catalog implementation
//!
//! In-process `DocumentStore` used by the test suite and single-node
//! development. Preserves insertion order as its natural order, which is what
//! `find_by_ids` returns records in.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::StoreError;

use super::filter::{brand_regex, ProductFilter, ProductSort};
use super::product::Product;
use super::store::DocumentStore;

/// In-memory catalog with `ProductFilter` semantics
#[derive(Default)]
pub struct MemoryCatalog {
    products: RwLock<Vec<Product>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Insert or replace a product by ID; replacement keeps its position in
    /// the natural order
    pub fn upsert(&self, product: Product) {
        let mut products = self.products.write().expect("catalog lock poisoned");
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }

    /// Remove a product by ID; returns whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let mut products = self.products.write().expect("catalog lock poisoned");
        let before = products.len();
        products.retain(|p| p.id != id);
        products.len() < before
    }

    pub fn len(&self) -> usize {
        self.products.read().expect("catalog lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn matches(product: &Product, filter: &ProductFilter, brand_patterns: &[Regex]) -> bool {
    if let Some(category) = &filter.category {
        let haystack = product.category.to_lowercase();
        if !haystack.contains(&category.to_lowercase()) {
            return false;
        }
    }

    if let Some(text) = &filter.text {
        let needle = text.to_lowercase();
        let in_name = product.name.to_lowercase().contains(&needle);
        let in_description = product.description.to_lowercase().contains(&needle);
        if !in_name && !in_description {
            return false;
        }
    }

    if let Some(min) = filter.price_min {
        if product.price < min {
            return false;
        }
    }

    if let Some(max) = filter.price_max {
        if product.price > max {
            return false;
        }
    }

    if let Some(featured) = filter.featured {
        if product.featured != featured {
            return false;
        }
    }

    // OR across brands, AND-combined with the clauses above. Tokens that did
    // not compile (blank input) place no constraint.
    if !brand_patterns.is_empty() && !brand_patterns.iter().any(|re| re.is_match(&product.name)) {
        return false;
    }

    true
}

fn compile_brands(filter: &ProductFilter) -> Vec<Regex> {
    filter.brands.iter().filter_map(|b| brand_regex(b)).collect()
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::Newest => {
            products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        ProductSort::PriceAsc => {
            products.sort_by(|a, b| a.price.total_cmp(&b.price));
        }
        ProductSort::PriceDesc => {
            products.sort_by(|a, b| b.price.total_cmp(&a.price));
        }
        ProductSort::Popular => {
            products.sort_by(|a, b| {
                b.review_count
                    .cmp(&a.review_count)
                    .then(b.rating.total_cmp(&a.rating))
            });
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryCatalog {
    async fn find_products(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let brand_patterns = compile_brands(filter);

        let mut matched: Vec<Product> = {
            let products = self.products.read().expect("catalog lock poisoned");
            products
                .iter()
                .filter(|p| matches(p, filter, &brand_patterns))
                .cloned()
                .collect()
        };

        sort_products(&mut matched, sort);

        Ok(matched
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let brand_patterns = compile_brands(filter);
        let products = self.products.read().expect("catalog lock poisoned");
        Ok(products
            .iter()
            .filter(|p| matches(p, filter, &brand_patterns))
            .count() as u64)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, StoreError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let products = self.products.read().expect("catalog lock poisoned");

        // Natural (insertion) order, deliberately ignoring the order of `ids`
        Ok(products
            .iter()
            .filter(|p| wanted.contains(p.id.as_str()))
            .cloned()
            .collect())
    }
}
