//! Catalog reads: products and categories.

use tracing::{debug, instrument};

use storepilot_core::{Category, CategoryId, ProductId, ProductSnapshot};

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError};
use crate::catalog::Pagination;

impl ApiClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of the product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(page = page.page, limit = page.limit))]
    pub async fn products(&self, page: Pagination) -> Result<Vec<ProductSnapshot>, ApiError> {
        let key = CacheKey::Products {
            offset: page.offset(),
            limit: page.limit,
        };
        if let Some(CacheValue::Products(products)) = self.inner.products.get(&key).await {
            debug!("Cache hit for product page");
            return Ok(products);
        }

        let mut url = self.endpoint("products")?;
        url.query_pairs_mut()
            .append_pair("limit", &page.limit.to_string())
            .append_pair("offset", &page.offset().to_string());
        let products: Vec<ProductSnapshot> = self.get(url).await?;

        self.inner
            .products
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Get every product. Used by search and the flash sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Vec<ProductSnapshot>, ApiError> {
        self.cached_products(CacheKey::AllProducts, "products").await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown ID, or another error if the
    /// API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<ProductSnapshot, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.products.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{id}"))?;
        let product: ProductSnapshot = self.get(url).await?;

        self.inner
            .products
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Get products related to `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn related_products(&self, id: ProductId) -> Result<Vec<ProductSnapshot>, ApiError> {
        self.cached_products(CacheKey::Related(id), &format!("products/{id}/related"))
            .await
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.categories.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint("categories")?;
        let categories: Vec<Category> = self.get(url).await?;

        self.inner
            .categories
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;
        Ok(categories)
    }

    /// Get the products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category_products(
        &self,
        id: CategoryId,
    ) -> Result<Vec<ProductSnapshot>, ApiError> {
        self.cached_products(
            CacheKey::CategoryProducts(id),
            &format!("categories/{id}/products"),
        )
        .await
    }

    /// Drop every cached catalog response.
    pub fn invalidate_catalog(&self) {
        self.inner.products.invalidate_all();
        self.inner.categories.invalidate_all();
    }

    async fn cached_products(
        &self,
        key: CacheKey,
        path: &str,
    ) -> Result<Vec<ProductSnapshot>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.products.get(&key).await {
            debug!(path, "Cache hit for product list");
            return Ok(products);
        }

        let url = self.endpoint(path)?;
        let products: Vec<ProductSnapshot> = self.get(url).await?;

        self.inner
            .products
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }
}
