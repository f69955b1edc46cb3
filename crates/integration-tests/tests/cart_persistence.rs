//! Cart and wishlist state over an on-disk store.
//!
//! Each test gets its own temporary data directory, so these run in parallel
//! without sharing state.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use storepilot_core::ProductId;
use storepilot_integration_tests::product;
use storepilot_storefront::session::{SessionStore, TokenPair};
use storepilot_storefront::shop::{CartChange, ShopError, ShopState};
use storepilot_storefront::storage::{FileStore, KeyValueStore, SharedStore, keys};

fn open_store(dir: &std::path::Path, quota: Option<u64>) -> SharedStore {
    Arc::new(FileStore::open(dir, quota).unwrap())
}

fn open_shop(store: &SharedStore) -> ShopState {
    ShopState::open(Arc::clone(store), Arc::new(SessionStore::new(Arc::clone(store))))
}

fn log_in(store: &SharedStore) {
    SessionStore::new(Arc::clone(store))
        .save_tokens(&TokenPair::new("access", "refresh"))
        .unwrap();
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), None);
    log_in(&store);

    let mut shop = open_shop(&store);
    shop.add_to_cart(product(7, 25), 2).unwrap();
    shop.add_to_cart(product(8, 10), 1).unwrap();
    shop.add_to_favorites(product(9, 5)).unwrap();
    let cart = shop.cart().clone();
    let favorites = shop.favorites().clone();
    drop(shop);

    // Fresh store handle over the same directory, as a new process would see it.
    let reopened = open_shop(&open_store(dir.path(), None));
    assert_eq!(reopened.cart(), &cart);
    assert_eq!(reopened.favorites(), &favorites);
    assert_eq!(reopened.cart_count(), 3);
}

#[test]
fn test_persisted_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), None);
    log_in(&store);

    let mut shop = open_shop(&store);
    shop.add_to_cart(product(7, 25), 2).unwrap();
    shop.add_to_favorites(product(7, 25)).unwrap();

    let cart: serde_json::Value =
        serde_json::from_str(&store.get_item(keys::CART).unwrap().unwrap()).unwrap();
    assert_eq!(cart[0]["id"], 7);
    assert_eq!(cart[0]["quantity"], 2);
    assert_eq!(cart[0]["title"], "Product 7");

    let favorites: serde_json::Value =
        serde_json::from_str(&store.get_item(keys::FAVORITES).unwrap().unwrap()).unwrap();
    assert_eq!(favorites[0]["id"], 7);
    assert!(favorites[0].get("quantity").is_none());

    assert!(dir.path().join("cart.json").exists());
}

#[test]
fn test_corrupt_cart_file_resets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "{not json").unwrap();

    let store = open_store(dir.path(), None);
    let shop = open_shop(&store);

    assert_eq!(shop.cart_count(), 0);
    assert_eq!(store.get_item(keys::CART).unwrap(), None);
    assert!(!dir.path().join("cart.json").exists());
}

#[test]
fn test_logged_out_mutations_leave_disk_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), None);
    log_in(&store);
    open_shop(&store).add_to_cart(product(1, 10), 1).unwrap();
    let before = store.get_item(keys::CART).unwrap();

    SessionStore::new(Arc::clone(&store)).logout().unwrap();
    let mut shop = open_shop(&store);
    assert_eq!(shop.add_to_cart(product(1, 10), 5), Err(ShopError::LoginRequired));
    assert_eq!(shop.clear_cart(), Err(ShopError::LoginRequired));

    assert_eq!(shop.cart_count(), 1);
    assert_eq!(store.get_item(keys::CART).unwrap(), before);
}

#[test]
fn test_quota_exceeded_keeps_memory_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), Some(200));
    log_in(&store);

    let mut shop = open_shop(&store);
    for id in 1..=10 {
        assert!(shop.add_to_cart(product(id, 10), 1).is_ok());
    }

    assert_eq!(shop.cart_count(), 10);
    assert!(shop.is_in_cart(ProductId::new(10)));
}

#[test]
fn test_decrease_to_zero_removes_line_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path(), None);
    log_in(&store);

    let mut shop = open_shop(&store);
    shop.add_to_cart(product(7, 25), 1).unwrap();
    assert_eq!(shop.decrease_quantity(ProductId::new(7)), Ok(CartChange::Removed));

    let reopened = open_shop(&store);
    assert!(reopened.cart().is_empty());
    assert_eq!(store.get_item(keys::CART).unwrap().as_deref(), Some("[]"));
}
