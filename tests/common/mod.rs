// Shared fixtures for integration tests

use chrono::{TimeZone, Utc};
use kaimono::catalog::Product;

/// Build a product with sensible defaults; `day` drives created_at ordering
pub fn product(id: &str, name: &str, price: f64, day: u32) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        category: "Electronics".to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        sku: format!("SKU-{}", id),
        price,
        original_price: None,
        rating: 4.0,
        review_count: 10,
        stock: 5,
        featured: false,
        created_at: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
    }
}
