// Product model and search-index projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical product record
///
/// The document store owns these; everything the rest of the crate hands out
/// (search results, cached payloads) carries full canonical records, never
/// partial index projections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub slug: String,
    pub sku: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub rating: f32,
    pub review_count: u32,
    pub stock: u32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized projection sent to the search index
///
/// Subset of product fields relevant to ranking and filtering. The index is a
/// derived, eventually-consistent view; it is entirely rebuildable from the
/// document store via `IndexSync::reindex_all`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub slug: String,
    pub sku: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub rating: f32,
    pub review_count: u32,
    pub stock: u32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for IndexDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            slug: product.slug.clone(),
            sku: product.sku.clone(),
            price: product.price,
            original_price: product.original_price,
            rating: product.rating,
            review_count: product.review_count,
            stock: product.stock,
            featured: product.featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Apple iPhone 15".to_string(),
            description: "Latest flagship phone".to_string(),
            category: "Phones".to_string(),
            slug: "apple-iphone-15".to_string(),
            sku: "APL-IP15".to_string(),
            price: 999.0,
            original_price: Some(1099.0),
            rating: 4.7,
            review_count: 312,
            stock: 14,
            featured: true,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_index_document_mirrors_product_fields() {
        let product = sample_product();
        let doc = IndexDocument::from(&product);

        assert_eq!(doc.id, product.id);
        assert_eq!(doc.name, product.name);
        assert_eq!(doc.description, product.description);
        assert_eq!(doc.category, product.category);
        assert_eq!(doc.price, product.price);
        assert_eq!(doc.original_price, product.original_price);
        assert_eq!(doc.review_count, product.review_count);
        assert_eq!(doc.featured, product.featured);
        assert_eq!(doc.created_at, product.created_at);
    }

    #[test]
    fn test_product_round_trips_through_json() {
        let product = sample_product();
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_absent_original_price_is_omitted_from_json() {
        let mut product = sample_product();
        product.original_price = None;

        let json = serde_json::to_string(&product).unwrap();
        assert!(!json.contains("original_price"));
    }
}
