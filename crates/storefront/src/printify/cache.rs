//! Cache types for Printify API responses.

use haqq_core::Product;

/// Key under which the product list is cached.
pub const PRODUCTS_KEY: &str = "products";

/// Key under which the resolved shop id is cached.
pub const SHOP_KEY: &str = "shop";

/// Cache key for a single product.
pub fn product_key(id: &str) -> String {
    format!("product:{id}")
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Shop(String),
    Product(Box<Product>),
    Products(Vec<Product>),
}
