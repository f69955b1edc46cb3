//! Checkout order summary.

use rust_decimal::Decimal;

use storepilot_core::Price;

use super::cart::Cart;

/// Flat sales tax applied to the subtotal (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Subtotal above which the storefront advertises free shipping.
pub const FREE_SHIPPING_THRESHOLD_DOLLARS: i64 = 50;

/// Totals shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    /// Sum of quantities.
    pub item_count: u64,
    /// Sum of line totals.
    pub subtotal: Price,
    /// Shipping charge. Always free.
    pub shipping: Price,
    /// Tax on the subtotal, rounded to cents.
    pub tax: Price,
    /// `subtotal + shipping + tax`.
    pub total: Price,
}

impl OrderSummary {
    /// Compute the summary for `cart`.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        let subtotal = cart.total();
        let shipping = Price::ZERO;
        let tax = subtotal.scaled(TAX_RATE);
        Self {
            item_count: cart.count(),
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Whether the subtotal reaches the free-shipping threshold.
    #[must_use]
    pub fn qualifies_for_free_shipping(&self) -> bool {
        !self.subtotal.is_below(FREE_SHIPPING_THRESHOLD_DOLLARS)
    }
}
