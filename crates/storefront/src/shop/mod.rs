//! Cart and wishlist state container.
//!
//! [`ShopState`] is the single owner of the cart and the wishlist for one
//! session. Presentation code reads through the query methods and changes
//! things only through the mutating operations, each of which:
//!
//! 1. hydrates from local storage if that has not happened yet,
//! 2. checks the [`AuthGate`](crate::session::AuthGate),
//! 3. applies the change in memory,
//! 4. writes the whole affected collection back to storage,
//! 5. broadcasts a [`ShopEvent`] to subscribers.
//!
//! A rejected call (no session token) returns [`ShopError::LoginRequired`]
//! and leaves both the collections and storage untouched.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use storepilot_core::{Price, ProductId, ProductSnapshot};
//! use storepilot_storefront::session::{SessionStore, TokenPair};
//! use storepilot_storefront::shop::{CartChange, ShopState};
//! use storepilot_storefront::storage::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let session = SessionStore::new(store.clone());
//! session.save_tokens(&TokenPair::new("access", "refresh")).unwrap();
//!
//! let mut shop = ShopState::open(store, Arc::new(session));
//! let lamp = ProductSnapshot::new(ProductId::new(7), "Lamp", Price::from_dollars(25));
//!
//! assert_eq!(shop.add_to_cart(lamp, 2), Ok(CartChange::Added { quantity: 2 }));
//! assert_eq!(shop.cart_count(), 2);
//! assert_eq!(shop.cart_total(), Price::from_dollars(50));
//! ```

mod cart;
mod favorites;
mod summary;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use storepilot_core::{Price, ProductId, ProductSnapshot};

use crate::session::SharedGate;
use crate::storage::{LocalPersistence, SharedStore, keys};

pub use cart::{Cart, CartChange, CartLineItem};
pub use favorites::{FavoriteChange, FavoriteEntry, Favorites};
pub use summary::{FREE_SHIPPING_THRESHOLD_DOLLARS, OrderSummary, TAX_RATE};

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 64;

/// Rejection returned by a gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShopError {
    /// No session token is present.
    #[error("you need to log in first")]
    LoginRequired,
}

/// Change notification for subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    /// The cart was written.
    CartChanged {
        /// Sum of quantities after the change.
        count: u64,
        /// Cart total after the change.
        total: Price,
    },
    /// The wishlist was written.
    FavoritesChanged {
        /// Number of entries after the change.
        count: usize,
    },
    /// A gated operation was attempted without a session.
    LoginRequired,
}

/// Hydration progress of a [`ShopState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// Created, storage not read yet.
    Uninitialized,
    /// Reading storage.
    Hydrating,
    /// Collections reflect storage; mutations allowed.
    Ready,
}

/// Owner of the cart and wishlist for one session.
pub struct ShopState {
    persistence: LocalPersistence,
    gate: SharedGate,
    cart: Cart,
    favorites: Favorites,
    hydration: Hydration,
    events: broadcast::Sender<ShopEvent>,
}

impl ShopState {
    /// Create an empty, not yet hydrated container.
    ///
    /// Call [`Self::hydrate`] before reading, or use [`Self::open`]. Mutating
    /// operations hydrate on their own.
    #[must_use]
    pub fn new(store: SharedStore, gate: SharedGate) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            persistence: LocalPersistence::new(store),
            gate,
            cart: Cart::new(),
            favorites: Favorites::new(),
            hydration: Hydration::Uninitialized,
            events,
        }
    }

    /// Create a container and hydrate it from storage.
    #[must_use]
    pub fn open(store: SharedStore, gate: SharedGate) -> Self {
        let mut shop = Self::new(store, gate);
        shop.hydrate();
        shop
    }

    /// Load both collections from storage. Runs once; later calls are no-ops.
    pub fn hydrate(&mut self) {
        if self.hydration != Hydration::Uninitialized {
            return;
        }
        self.hydration = Hydration::Hydrating;

        self.cart = Cart::from_items(self.persistence.load(keys::CART));
        self.favorites = Favorites::from_items(self.persistence.load(keys::FAVORITES));

        self.hydration = Hydration::Ready;
        debug!(
            cart_lines = self.cart.len(),
            favorites = self.favorites.len(),
            "Shop state hydrated"
        );
    }

    /// Current hydration progress.
    #[must_use]
    pub const fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// Receive an event after every gated operation.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShopEvent> {
        self.events.subscribe()
    }

    /// Run the login check on its own, without changing anything.
    ///
    /// Lets callers bail out before fetching the product a mutation needs.
    /// A rejection is logged and broadcast like a rejected mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn ensure_session(&mut self) -> Result<(), ShopError> {
        self.authorize("ensure_session")
    }

    // =========================================================================
    // Cart operations
    // =========================================================================

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn add_to_cart(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<CartChange, ShopError> {
        self.authorize("add_to_cart")?;
        let id = product.id;
        let change = self.cart.add(product, quantity);
        info!(product_id = %id, ?change, "Cart updated");
        self.commit_cart();
        Ok(change)
    }

    /// Drop the line for `id`. Absent lines are a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Result<CartChange, ShopError> {
        self.authorize("remove_from_cart")?;
        let change = self.cart.remove(id);
        info!(product_id = %id, ?change, "Cart updated");
        self.commit_cart();
        Ok(change)
    }

    /// Set the quantity for `id`; zero or below removes the line.
    ///
    /// Quantities above `u32::MAX` are clamped to `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn update_quantity(
        &mut self,
        id: ProductId,
        quantity: i64,
    ) -> Result<CartChange, ShopError> {
        self.authorize("update_quantity")?;
        let change = self.cart.set_quantity(id, quantity);
        info!(product_id = %id, ?change, "Cart updated");
        self.commit_cart();
        Ok(change)
    }

    /// Add one unit to the line for `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn increase_quantity(&mut self, id: ProductId) -> Result<CartChange, ShopError> {
        self.authorize("increase_quantity")?;
        let change = self.cart.increase(id);
        info!(product_id = %id, ?change, "Cart updated");
        self.commit_cart();
        Ok(change)
    }

    /// Take one unit off the line for `id`.
    ///
    /// Returns [`CartChange::Removed`] when the last unit goes, so callers do
    /// not need a follow-up [`Self::is_in_cart`] check.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn decrease_quantity(&mut self, id: ProductId) -> Result<CartChange, ShopError> {
        self.authorize("decrease_quantity")?;
        let change = self.cart.decrease(id);
        info!(product_id = %id, ?change, "Cart updated");
        self.commit_cart();
        Ok(change)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn clear_cart(&mut self) -> Result<CartChange, ShopError> {
        self.authorize("clear_cart")?;
        let change = self.cart.clear();
        info!("Cart cleared");
        self.commit_cart();
        Ok(change)
    }

    // =========================================================================
    // Cart queries
    // =========================================================================

    /// The cart lines.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether `id` has a cart line.
    #[must_use]
    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.cart.contains(id)
    }

    /// Quantity of `id` in the cart, 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, id: ProductId) -> u32 {
        self.cart.quantity_of(id)
    }

    /// Sum of `price * quantity`.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities, the navbar badge number.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// Subtotal, tax and total for checkout.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary {
        OrderSummary::from_cart(&self.cart)
    }

    // =========================================================================
    // Wishlist operations
    // =========================================================================

    /// Wishlist `product`. Already-wishlisted products are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn add_to_favorites(
        &mut self,
        product: ProductSnapshot,
    ) -> Result<FavoriteChange, ShopError> {
        self.authorize("add_to_favorites")?;
        let id = product.id;
        let change = self.favorites.add(product);
        info!(product_id = %id, ?change, "Wishlist updated");
        self.commit_favorites();
        Ok(change)
    }

    /// Drop `id` from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn remove_from_favorites(&mut self, id: ProductId) -> Result<FavoriteChange, ShopError> {
        self.authorize("remove_from_favorites")?;
        let change = self.favorites.remove(id);
        info!(product_id = %id, ?change, "Wishlist updated");
        self.commit_favorites();
        Ok(change)
    }

    /// Remove `product` if wishlisted, otherwise add it.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn toggle_favorite(
        &mut self,
        product: ProductSnapshot,
    ) -> Result<FavoriteChange, ShopError> {
        self.authorize("toggle_favorite")?;
        let id = product.id;
        let change = self.favorites.toggle(product);
        info!(product_id = %id, ?change, "Wishlist updated");
        self.commit_favorites();
        Ok(change)
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::LoginRequired`] without a session token.
    pub fn clear_favorites(&mut self) -> Result<FavoriteChange, ShopError> {
        self.authorize("clear_favorites")?;
        let change = self.favorites.clear();
        info!("Wishlist cleared");
        self.commit_favorites();
        Ok(change)
    }

    // =========================================================================
    // Wishlist queries
    // =========================================================================

    /// The wishlist entries.
    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Whether `id` is wishlisted.
    #[must_use]
    pub fn is_in_favorites(&self, id: ProductId) -> bool {
        self.favorites.contains(id)
    }

    /// Number of wishlist entries.
    #[must_use]
    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn authorize(&mut self, operation: &'static str) -> Result<(), ShopError> {
        self.hydrate();
        if self.gate.is_authenticated() {
            return Ok(());
        }
        warn!(operation, "Rejected shop operation without a session");
        let _ = self.events.send(ShopEvent::LoginRequired);
        Err(ShopError::LoginRequired)
    }

    fn commit_cart(&self) {
        self.persistence.save(keys::CART, self.cart.items());
        let _ = self.events.send(ShopEvent::CartChanged {
            count: self.cart.count(),
            total: self.cart.total(),
        });
    }

    fn commit_favorites(&self) {
        self.persistence.save(keys::FAVORITES, self.favorites.items());
        let _ = self.events.send(ShopEvent::FavoritesChanged {
            count: self.favorites.len(),
        });
    }
}

impl std::fmt::Debug for ShopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopState")
            .field("hydration", &self.hydration)
            .field("cart", &self.cart)
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}
