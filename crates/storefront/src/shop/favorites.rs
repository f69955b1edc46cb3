//! The wishlist collection.

use serde::{Deserialize, Serialize};

use storepilot_core::{ProductId, ProductSnapshot};

/// A wishlisted product. Persisted as the bare snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteEntry {
    /// Snapshot taken when the product was wishlisted.
    pub product: ProductSnapshot,
}

impl FavoriteEntry {
    /// Key of this entry.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// What a wishlist operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    /// The product was added.
    Added,
    /// The product was already wishlisted; nothing changed.
    AlreadyPresent,
    /// The product was removed.
    Removed,
    /// Every entry was removed.
    Cleared,
    /// The product was not wishlisted; nothing changed.
    Unchanged,
}

/// Ordered wishlist entries, at most one per product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    items: Vec<FavoriteEntry>,
}

impl Favorites {
    /// Create an empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wishlist from persisted entries, keeping the first of any
    /// duplicates.
    #[must_use]
    pub fn from_items(items: Vec<FavoriteEntry>) -> Self {
        let mut favorites = Self::new();
        for entry in items {
            if !favorites.contains(entry.product_id()) {
                favorites.items.push(entry);
            }
        }
        favorites
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[FavoriteEntry] {
        &self.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wishlist `product` unless it already is.
    pub fn add(&mut self, product: ProductSnapshot) -> FavoriteChange {
        if self.contains(product.id) {
            return FavoriteChange::AlreadyPresent;
        }
        self.items.push(FavoriteEntry { product });
        FavoriteChange::Added
    }

    /// Drop the entry for `id`.
    pub fn remove(&mut self, id: ProductId) -> FavoriteChange {
        let before = self.items.len();
        self.items.retain(|entry| entry.product_id() != id);
        if self.items.len() == before {
            FavoriteChange::Unchanged
        } else {
            FavoriteChange::Removed
        }
    }

    /// Remove `product` if wishlisted, otherwise add it.
    pub fn toggle(&mut self, product: ProductSnapshot) -> FavoriteChange {
        if self.contains(product.id) {
            self.remove(product.id)
        } else {
            self.add(product)
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) -> FavoriteChange {
        self.items.clear();
        FavoriteChange::Cleared
    }

    /// Whether `id` is wishlisted.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|entry| entry.product_id() == id)
    }
}
