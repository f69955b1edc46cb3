//! Flash sale: the cheap end of the catalog behind a daily countdown.

use core::fmt;

use chrono::{DateTime, Utc};

use storepilot_core::ProductSnapshot;

/// Products strictly cheaper than this many dollars are on sale.
pub const SALE_PRICE_CEILING: i64 = 100;

/// At most this many products are shown.
pub const SALE_LIMIT: usize = 12;

/// The first [`SALE_LIMIT`] products under [`SALE_PRICE_CEILING`], in catalog order.
#[must_use]
pub fn sale_products(products: &[ProductSnapshot]) -> Vec<&ProductSnapshot> {
    products
        .iter()
        .filter(|p| p.price.is_below(SALE_PRICE_CEILING))
        .take(SALE_LIMIT)
        .collect()
}

/// Time left in the sale, rendered as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Countdown {
    remaining_secs: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::start()
    }
}

impl Countdown {
    /// Length of a sale, 23:59:59.
    pub const START_SECS: u32 = 23 * 3600 + 59 * 60 + 59;

    /// A fresh countdown at 23:59:59.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            remaining_secs: Self::START_SECS,
        }
    }

    /// A countdown at an arbitrary point. Values past the start are clamped.
    #[must_use]
    pub fn from_parts(hours: u32, minutes: u32, seconds: u32) -> Self {
        let total = hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(seconds);
        Self {
            remaining_secs: total.min(Self::START_SECS),
        }
    }

    /// The value a countdown started at `started` shows at `now`.
    #[must_use]
    pub fn remaining_at(started: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = (now - started).num_seconds().max(0);
        let remaining = i64::from(Self::START_SECS).saturating_sub(elapsed).max(0);
        Self {
            remaining_secs: u32::try_from(remaining).unwrap_or(0),
        }
    }

    /// Advance one second. Stays at 00:00:00 once reached.
    pub fn tick(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
    }

    /// Whether the sale is over.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Whole hours left.
    #[must_use]
    pub const fn hours(&self) -> u32 {
        self.remaining_secs / 3600
    }

    /// Minutes left past the whole hours.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.remaining_secs % 3600 / 60
    }

    /// Seconds left past the whole minutes.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.remaining_secs % 60
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use storepilot_core::{Price, ProductId};

    use super::*;

    #[test]
    fn test_sale_products_filters_and_caps() {
        let products: Vec<_> = (1..=30)
            .map(|id| {
                let dollars = if id % 2 == 0 { 99 } else { 100 };
                ProductSnapshot::new(ProductId::new(id), "Item", Price::from_dollars(dollars))
            })
            .collect();

        let sale = sale_products(&products);
        assert_eq!(sale.len(), SALE_LIMIT);
        assert!(sale.iter().all(|p| p.price == Price::from_dollars(99)));
        assert_eq!(sale[0].id, ProductId::new(2));
        assert_eq!(sale[11].id, ProductId::new(24));
    }

    #[test]
    fn test_starts_at_full_day_minus_one_second() {
        assert_eq!(Countdown::start().to_string(), "23:59:59");
    }

    #[test]
    fn test_tick_borrows_across_units() {
        let mut countdown = Countdown::from_parts(1, 0, 0);
        countdown.tick();
        assert_eq!(countdown.to_string(), "00:59:59");

        let mut countdown = Countdown::from_parts(0, 1, 0);
        countdown.tick();
        assert_eq!(countdown.to_string(), "00:00:59");
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut countdown = Countdown::from_parts(0, 0, 1);
        countdown.tick();
        assert!(countdown.is_finished());
        countdown.tick();
        assert_eq!(countdown.to_string(), "00:00:00");
    }

    #[test]
    fn test_remaining_at() {
        let started = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();
        let now = started + TimeDelta::seconds(3600 + 61);
        assert_eq!(Countdown::remaining_at(started, now).to_string(), "22:58:58");

        let much_later = started + TimeDelta::days(2);
        assert!(Countdown::remaining_at(started, much_later).is_finished());

        let earlier = started - TimeDelta::seconds(5);
        assert_eq!(Countdown::remaining_at(started, earlier), Countdown::start());
    }
}
