//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API sends prices as bare JSON numbers in US dollars. `Price`
//! keeps them as [`Decimal`] in memory so cart totals never accumulate binary
//! floating-point error, and writes them back out as JSON numbers so the
//! persisted cart keeps the API's shape.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A price in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a price from a whole number of dollars.
    #[must_use]
    pub fn from_dollars(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }

    /// The dollar amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a line quantity.
    ///
    /// Saturates at [`Decimal::MAX`] (or [`Decimal::MIN`] for a negative
    /// price) instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        let factor = Decimal::from(quantity);
        self.0
            .checked_mul(factor)
            .map_or_else(|| Self::saturated(self.0.is_sign_negative()), Self)
    }

    /// This price scaled by `rate` and rounded to whole cents.
    ///
    /// Used for percentage charges such as tax (`rate = 0.10`).
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Self {
        self.0.checked_mul(rate).map_or_else(
            || Self::saturated(self.0.is_sign_negative() != rate.is_sign_negative()),
            |amount| Self(amount).round_cents(),
        )
    }

    /// Sum of two prices, saturating like [`Price::times`].
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        self.0
            .checked_add(rhs.0)
            .map_or_else(|| Self::saturated(self.0.is_sign_negative()), Self)
    }

    const fn saturated(negative: bool) -> Self {
        if negative {
            Self(Decimal::MIN)
        } else {
            Self(Decimal::MAX)
        }
    }

    /// Round to two decimal places, half away from zero.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Whether this price is strictly below a whole-dollar threshold.
    #[must_use]
    pub fn is_below(&self, dollars: i64) -> bool {
        self.0 < Decimal::from(dollars)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Formats as US currency, e.g. `$1,234.50`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.2}", rounded.abs());
        let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}${grouped}.{cents}")
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).amount(), Decimal::new(1999, 2));
        assert_eq!(Price::from_cents(-250).amount(), Decimal::new(-250, 2));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_dollars(25).times(2), Price::from_cents(999).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(7997));
    }

    #[test]
    fn test_scaled_rounds_to_cents() {
        let tax = Price::from_cents(1999).scaled(Decimal::new(1, 1));
        assert_eq!(tax, Price::from_cents(200));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_dollars(50).to_string(), "$50.00");
        assert_eq!(Price::from_cents(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Price::from_cents(100_000).to_string(), "$1,000.00");
        assert_eq!(Price::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_deserializes_json_numbers() {
        let whole: Price = serde_json::from_str("25").unwrap();
        assert_eq!(whole, Price::from_dollars(25));

        let fractional: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(fractional, Price::from_cents(1999));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let value = serde_json::to_value(Price::from_cents(1999)).unwrap();
        assert!(value.is_number());
        assert!((value.as_f64().unwrap() - 19.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_times_saturates_instead_of_overflowing() {
        let huge = Price::new(Decimal::from_i128_with_scale(10_i128.pow(20), 0));
        assert_eq!(huge.times(u32::MAX), Price::new(Decimal::MAX));
        assert_eq!(
            Price::new(-Decimal::from_i128_with_scale(10_i128.pow(20), 0)).times(u32::MAX),
            Price::new(Decimal::MIN)
        );
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        let total: Price = [Price::new(Decimal::MAX), Price::from_dollars(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(Decimal::MAX));
        assert_eq!(
            Price::new(Decimal::MAX) + Price::new(Decimal::MAX),
            Price::new(Decimal::MAX)
        );
        assert_eq!(
            Price::new(Decimal::MIN) + Price::from_dollars(-1),
            Price::new(Decimal::MIN)
        );
    }

    #[test]
    fn test_saturated_price_still_displays() {
        assert!(Price::new(Decimal::MAX).to_string().starts_with("$79,228,162,514,"));
    }

    #[test]
    fn test_is_below() {
        assert!(Price::from_cents(9999).is_below(100));
        assert!(!Price::from_dollars(100).is_below(100));
    }
}
