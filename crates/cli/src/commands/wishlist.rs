//! Wishlist commands.

use storepilot_core::ProductId;
use storepilot_storefront::{AppState, Result};

use crate::render::{self, Notification};

/// Show the wishlist.
#[must_use]
pub fn show(state: &AppState) -> String {
    render::wishlist(state.open_shop().favorites())
}

/// Fetch a product and wishlist it.
///
/// The login check runs before the fetch.
///
/// # Errors
///
/// Returns an error if no one is logged in or the product cannot be fetched.
pub async fn add(state: &AppState, id: ProductId) -> Result<String> {
    let mut shop = state.open_shop();
    shop.ensure_session()?;
    let product = state.api().product(id).await?;
    let change = shop.add_to_favorites(product)?;
    Ok(format!("{}\n", Notification::favorites(change)))
}

/// Remove a product from the wishlist.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn remove(state: &AppState, id: ProductId) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.remove_from_favorites(id)?;
    Ok(format!("{}\n", Notification::favorites(change)))
}

/// Wishlist a product, or remove it if already there.
///
/// Only fetches the product when it has to be added, and only after the
/// login check.
///
/// # Errors
///
/// Returns an error if no one is logged in or the product cannot be fetched.
pub async fn toggle(state: &AppState, id: ProductId) -> Result<String> {
    let mut shop = state.open_shop();
    shop.ensure_session()?;
    let change = if shop.is_in_favorites(id) {
        shop.remove_from_favorites(id)?
    } else {
        let product = state.api().product(id).await?;
        shop.toggle_favorite(product)?
    };
    Ok(format!("{}\n", Notification::favorites(change)))
}

/// Empty the wishlist.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn clear(state: &AppState) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.clear_favorites()?;
    Ok(format!("{}\n", Notification::favorites(change)))
}
