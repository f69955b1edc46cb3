//! Login, signup and profile flows against the fake API.

#![allow(clippy::unwrap_used)]

use storepilot_core::ProductId;
use storepilot_integration_tests::{FakeApi, KNOWN_EMAIL, KNOWN_PASSWORD};
use storepilot_storefront::AppState;
use storepilot_storefront::accounts::AccountError;
use storepilot_storefront::api::ApiError;
use storepilot_storefront::shop::ShopError;

async fn setup() -> (FakeApi, tempfile::TempDir, AppState) {
    let api = FakeApi::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(api.config(dir.path())).unwrap();
    (api, dir, state)
}

#[tokio::test]
async fn test_login_unlocks_the_cart() {
    let (_api, _dir, state) = setup().await;
    let product = state.api().product(ProductId::new(3)).await.unwrap();

    let mut shop = state.open_shop();
    assert_eq!(
        shop.add_to_cart(product.clone(), 1),
        Err(ShopError::LoginRequired)
    );

    state.accounts().login(KNOWN_EMAIL, KNOWN_PASSWORD).await.unwrap();
    assert!(state.session().access_token().is_some());
    assert!(shop.add_to_cart(product, 1).is_ok());

    state.accounts().logout().unwrap();
    assert!(state.session().access_token().is_none());
    // Logout keeps the cart; it just becomes read-only.
    let shop = state.open_shop();
    assert_eq!(shop.cart_count(), 1);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let (_api, _dir, state) = setup().await;
    let err = state
        .accounts()
        .login(KNOWN_EMAIL, "wrongpass1")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Api(ApiError::Unauthorized(_))));
    assert!(state.session().access_token().is_none());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_api() {
    let (api, _dir, state) = setup().await;

    let err = state.accounts().login("john", KNOWN_PASSWORD).await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidEmail(_)));

    let err = state.accounts().login(KNOWN_EMAIL, "short").await.unwrap_err();
    assert!(matches!(err, AccountError::WeakPassword(_)));

    let err = state
        .accounts()
        .signup("Al", "al@mail.com", "abc123", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NameTooShort { min: 3 }));

    assert_eq!(api.requests(), 0);
}

#[tokio::test]
async fn test_signup_defaults_avatar_and_rejects_duplicates() {
    let (_api, _dir, state) = setup().await;

    let profile = state
        .accounts()
        .signup("Maria", "maria@mail.com", "abc123", None)
        .await
        .unwrap();
    assert_eq!(profile.name, "Maria");
    assert_eq!(profile.avatar.as_deref(), Some("https://picsum.photos/800"));

    let err = state
        .accounts()
        .signup("Maria", "maria@mail.com", "abc123", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Api(ApiError::Conflict(_))));
}

#[tokio::test]
async fn test_profile_requires_login() {
    let (_api, _dir, state) = setup().await;
    let err = state.accounts().profile().await.unwrap_err();
    assert!(matches!(err, AccountError::NotLoggedIn));

    state.accounts().login(KNOWN_EMAIL, KNOWN_PASSWORD).await.unwrap();
    let profile = state.accounts().profile().await.unwrap();
    assert_eq!(profile.email, KNOWN_EMAIL);
}

#[tokio::test]
async fn test_update_profile() {
    let (_api, _dir, state) = setup().await;
    state.accounts().login(KNOWN_EMAIL, KNOWN_PASSWORD).await.unwrap();

    let updated = state
        .accounts()
        .update_profile("Johnny", "johnny@mail.com")
        .await
        .unwrap();
    assert_eq!(updated.name, "Johnny");
    assert_eq!(updated.email, "johnny@mail.com");

    let err = state
        .accounts()
        .update_profile("Johnny", "not-an-email")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InvalidEmail(_)));
}
