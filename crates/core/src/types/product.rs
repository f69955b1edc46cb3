//! Product snapshots.
//!
//! A snapshot is whatever the catalog API returned at the moment the user
//! acted on a product. The cart and wishlist store snapshots verbatim and
//! never re-fetch them, so a later price change upstream does not move the
//! cart total.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::ProductId;
use super::price::Price;

/// Product attributes copied from the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product ID, the key for cart and wishlist lookups.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category the product belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Image URLs, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Single image URL used by some payloads instead of `images`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Rating, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl ProductSnapshot {
    /// Create a minimal snapshot with only the fields the cart needs.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            slug: None,
            price,
            description: None,
            category: None,
            images: Vec::new(),
            image: None,
            rating: None,
        }
    }

    /// The image to show on cards: first of `images`, else `image`.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.image.as_deref())
    }

    /// Category name, if the snapshot carries one.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Star rating for display.
    ///
    /// Falls back to a placeholder derived from the ID so the same product
    /// always shows the same stars. Cosmetic only.
    #[must_use]
    pub fn display_rating(&self) -> f64 {
        if let Some(rating) = self.rating {
            return rating;
        }
        #[allow(clippy::cast_precision_loss)]
        let id = self.id.as_i64() as f64;
        let value = (id * 0.1).rem_euclid(1.5) + 3.5;
        (value * 10.0).round() / 10.0
    }
}
