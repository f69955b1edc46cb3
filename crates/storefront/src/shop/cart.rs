//! Cart line items and the ordered cart collection.

use serde::{Deserialize, Serialize};

use storepilot_core::{Price, ProductId, ProductSnapshot};

/// One product in the cart together with how many of it.
///
/// Serialized flat, `{ ...productFields, "quantity": n }`, which is the
/// persisted layout of the `cart` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Snapshot taken when the product was first added.
    #[serde(flatten)]
    pub product: ProductSnapshot,
    /// Number of units, at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    /// Key of this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added {
        /// Quantity of the new line.
        quantity: u32,
    },
    /// An existing line grew.
    QuantityIncreased {
        /// Quantity after the change.
        quantity: u32,
    },
    /// An existing line shrank but is still in the cart.
    QuantityDecreased {
        /// Quantity after the change.
        quantity: u32,
    },
    /// An existing line was set to an explicit quantity.
    QuantityUpdated {
        /// Quantity after the change.
        quantity: u32,
    },
    /// A line was dropped.
    Removed,
    /// Every line was dropped.
    Cleared,
    /// Nothing matched; the cart is as it was.
    Unchanged,
}

/// Ordered cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from persisted lines.
    ///
    /// Lines repeating a product are merged into the first occurrence and
    /// zero-quantity lines are dropped, so the one-line-per-product invariant
    /// holds even for hand-edited data.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(item.product_id()) {
                Some(i) => {
                    if let Some(existing) = cart.items.get_mut(i) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line keeps its original snapshot and only grows.
    pub fn add(&mut self, product: ProductSnapshot, quantity: u32) -> CartChange {
        if quantity == 0 {
            return CartChange::Unchanged;
        }
        match self.line_mut(product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                CartChange::QuantityIncreased {
                    quantity: line.quantity,
                }
            }
            None => {
                self.items.push(CartLineItem { product, quantity });
                CartChange::Added { quantity }
            }
        }
    }

    /// Drop the line for `id`.
    pub fn remove(&mut self, id: ProductId) -> CartChange {
        match self.position(id) {
            Some(i) => {
                self.items.remove(i);
                CartChange::Removed
            }
            None => CartChange::Unchanged,
        }
    }

    /// Set the line for `id` to `quantity`; zero or below removes it.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> CartChange {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.line_mut(id) {
            Some(line) => {
                line.quantity = quantity;
                CartChange::QuantityUpdated { quantity }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Add one unit to an existing line.
    pub fn increase(&mut self, id: ProductId) -> CartChange {
        match self.line_mut(id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                CartChange::QuantityIncreased {
                    quantity: line.quantity,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Take one unit off a line, dropping it when the last unit goes.
    pub fn decrease(&mut self, id: ProductId) -> CartChange {
        let Some(i) = self.position(id) else {
            return CartChange::Unchanged;
        };
        match self.items.get_mut(i) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                CartChange::QuantityDecreased {
                    quantity: line.quantity,
                }
            }
            _ => {
                self.items.remove(i);
                CartChange::Removed
            }
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) -> CartChange {
        self.items.clear();
        CartChange::Cleared
    }

    /// Whether a line exists for `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    /// Quantity in the cart for `id`, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|line| line.product_id() == id)
            .map_or(0, |line| line.quantity)
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|line| line.product_id() == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|line| line.product_id() == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, dollars: i64) -> ProductSnapshot {
        ProductSnapshot::new(ProductId::new(id), format!("Product {id}"), Price::from_dollars(dollars))
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(product(7, 25), 2), CartChange::Added { quantity: 2 });
        assert_eq!(
            cart.add(product(7, 25), 3),
            CartChange::QuantityIncreased { quantity: 5 }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(7)), 5);
    }

    #[test]
    fn test_add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add(product(7, 25), 1);
        cart.add(product(7, 99), 1);
        assert_eq!(cart.total(), Price::from_dollars(50));
    }

    #[test]
    fn test_add_zero_is_unchanged() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(product(1, 10), 0), CartChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrease_walks_down_then_removes() {
        let mut cart = Cart::new();
        cart.add(product(7, 25), 3);
        let id = ProductId::new(7);

        assert_eq!(cart.decrease(id), CartChange::QuantityDecreased { quantity: 2 });
        assert_eq!(cart.decrease(id), CartChange::QuantityDecreased { quantity: 1 });
        assert_eq!(cart.decrease(id), CartChange::Removed);
        assert!(!cart.contains(id));
        assert_eq!(cart.decrease(id), CartChange::Unchanged);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(product(1, 10), 1);
        let id = ProductId::new(1);

        assert_eq!(cart.set_quantity(id, 4), CartChange::QuantityUpdated { quantity: 4 });
        assert_eq!(cart.count(), 4);
        assert_eq!(cart.set_quantity(ProductId::new(2), 4), CartChange::Unchanged);
        assert_eq!(cart.set_quantity(id, 0), CartChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_negative_quantity_removes() {
        let mut cart = Cart::new();
        cart.add(product(1, 10), 2);
        assert_eq!(cart.set_quantity(ProductId::new(1), -3), CartChange::Removed);
    }

    #[test]
    fn test_increase_requires_existing_line() {
        let mut cart = Cart::new();
        assert_eq!(cart.increase(ProductId::new(1)), CartChange::Unchanged);
        cart.add(product(1, 10), 1);
        assert_eq!(
            cart.increase(ProductId::new(1)),
            CartChange::QuantityIncreased { quantity: 2 }
        );
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(product(1, 10), 2);
        cart.add(ProductSnapshot::new(ProductId::new(2), "Pen", Price::from_cents(150)), 3);
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.total(), Price::from_cents(2450));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart = Cart::new();
        for id in 1..=3 {
            cart.add(product(id, 1), 1);
        }
        assert_eq!(cart.remove(ProductId::new(2)), CartChange::Removed);
        assert_eq!(cart.remove(ProductId::new(2)), CartChange::Unchanged);
        let ids: Vec<i64> = cart.items().iter().map(|l| l.product_id().as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_from_items_merges_and_drops_empty_lines() {
        let items = vec![
            CartLineItem { product: product(1, 10), quantity: 1 },
            CartLineItem { product: product(2, 10), quantity: 0 },
            CartLineItem { product: product(1, 10), quantity: 2 },
        ];
        let cart = Cart::from_items(items);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 3);
    }

    #[test]
    fn test_line_item_serializes_flat() {
        let line = CartLineItem { product: product(7, 25), quantity: 2 };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["quantity"], 2);
        assert_eq!(value["title"], "Product 7");

        let back: CartLineItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
    }
}
