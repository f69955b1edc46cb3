//! Browsing: product pages, categories, search and the flash sale.

use chrono::Utc;
use tracing::info;

use storepilot_core::{CategoryId, ProductId};
use storepilot_storefront::catalog::{Countdown, Pagination, sale_products, search_by_title};
use storepilot_storefront::{AppState, Result};

use crate::render;

/// List one page of products.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn products(state: &AppState, page: u32, limit: Option<u32>) -> Result<String> {
    let page = Pagination::new(page, limit.unwrap_or(state.config().page_size));
    let products = state.api().products(page).await?;
    info!(page = page.page, count = products.len(), "Listed products");
    Ok(render::product_list(&products, Some(page)))
}

/// Show one product with related products.
///
/// # Errors
///
/// Returns an error if the product does not exist or the API request fails.
pub async fn product(state: &AppState, id: ProductId) -> Result<String> {
    let (product, related) = tokio::try_join!(
        state.api().product(id),
        state.api().related_products(id)
    )?;
    let shop = state.open_shop();
    Ok(render::product_detail(&product, &related, &shop))
}

/// List all categories.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn categories(state: &AppState) -> Result<String> {
    let categories = state.api().categories().await?;
    Ok(render::categories(&categories))
}

/// List the products in a category.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn category(state: &AppState, id: CategoryId) -> Result<String> {
    let products = state.api().category_products(id).await?;
    Ok(render::product_list(&products, None))
}

/// Search product titles.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn search(state: &AppState, query: &str) -> Result<String> {
    if query.trim().is_empty() {
        return Ok(render::search_results(query, &[]));
    }
    let products = state.api().all_products().await?;
    let matches = search_by_title(&products, query);
    info!(query, matches = matches.len(), "Searched products");
    Ok(render::search_results(query, &matches))
}

/// Show the flash sale.
///
/// The countdown restarts every UTC day.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn flash_sale(state: &AppState) -> Result<String> {
    let products = state.api().all_products().await?;
    let now = Utc::now();
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map_or(now, |start| start.and_utc());
    let countdown = Countdown::remaining_at(midnight, now);
    Ok(render::flash_sale(&sale_products(&products), countdown))
}
