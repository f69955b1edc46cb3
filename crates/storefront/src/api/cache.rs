//! Cache types for catalog API responses.

use storepilot_core::{Category, CategoryId, ProductId, ProductSnapshot};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { offset: u32, limit: u32 },
    AllProducts,
    Related(ProductId),
    Categories,
    CategoryProducts(CategoryId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<ProductSnapshot>),
    Products(Vec<ProductSnapshot>),
    Categories(Vec<Category>),
}
