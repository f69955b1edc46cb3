//! Cart commands.

use storepilot_core::ProductId;
use storepilot_storefront::{AppState, Result};

use crate::render::{self, Notification};

/// Show the cart and order summary.
#[must_use]
pub fn show(state: &AppState) -> String {
    render::cart(&state.open_shop())
}

/// Fetch a product and add `quantity` units.
///
/// The login check runs before the fetch.
///
/// # Errors
///
/// Returns an error if no one is logged in or the product cannot be fetched.
pub async fn add(state: &AppState, id: ProductId, quantity: u32) -> Result<String> {
    let mut shop = state.open_shop();
    shop.ensure_session()?;
    let product = state.api().product(id).await?;
    let change = shop.add_to_cart(product, quantity)?;
    Ok(with_count(Notification::cart(change), shop.cart_count()))
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn remove(state: &AppState, id: ProductId) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.remove_from_cart(id)?;
    Ok(with_count(Notification::cart(change), shop.cart_count()))
}

/// Set a line's quantity; zero or below removes it.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn set(state: &AppState, id: ProductId, quantity: i64) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.update_quantity(id, quantity)?;
    Ok(with_count(Notification::cart(change), shop.cart_count()))
}

/// Add one unit.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn increase(state: &AppState, id: ProductId) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.increase_quantity(id)?;
    Ok(with_count(Notification::cart(change), shop.cart_count()))
}

/// Take one unit off, removing the line at one.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn decrease(state: &AppState, id: ProductId) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.decrease_quantity(id)?;
    Ok(with_count(Notification::cart(change), shop.cart_count()))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if no one is logged in.
pub fn clear(state: &AppState) -> Result<String> {
    let mut shop = state.open_shop();
    let change = shop.clear_cart()?;
    Ok(format!("{}\n", Notification::cart(change)))
}

fn with_count(notification: Notification, count: u64) -> String {
    format!("{notification}\nCart: {count} item(s)\n")
}
