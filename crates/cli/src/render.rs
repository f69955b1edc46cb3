//! Plain-text rendering of storefront data.
//!
//! Every function returns a `String`; `main` owns writing to stdout.

use std::fmt::Write as _;

use storepilot_core::{Category, Price, ProductSnapshot};
use storepilot_storefront::catalog::{Countdown, PageLink, Pagination};
use storepilot_storefront::models::UserProfile;
use storepilot_storefront::shop::{
    CartChange, FREE_SHIPPING_THRESHOLD_DOLLARS, FavoriteChange, Favorites, OrderSummary,
    ShopError, ShopState,
};

/// Severity of a notification line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
}

/// One-line outcome message, the terminal version of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Message for a rejected cart or wishlist operation.
    pub fn rejected(error: ShopError) -> Self {
        match error {
            ShopError::LoginRequired => Self::warning("You need to login first!"),
        }
    }

    /// Message for a cart operation outcome.
    pub fn cart(change: CartChange) -> Self {
        match change {
            CartChange::Added { .. } => Self::success("Product added to cart successfully!"),
            CartChange::QuantityIncreased { quantity } => {
                Self::info(format!("Product quantity increased to {quantity}"))
            }
            CartChange::QuantityDecreased { quantity } => {
                Self::info(format!("Product quantity decreased to {quantity}"))
            }
            CartChange::QuantityUpdated { quantity } => {
                Self::info(format!("Product quantity set to {quantity}"))
            }
            CartChange::Removed => Self::warning("Product removed from cart!"),
            CartChange::Cleared => Self::warning("Your cart has been cleared!"),
            CartChange::Unchanged => Self::info("Cart unchanged"),
        }
    }

    /// Message for a wishlist operation outcome.
    pub fn favorites(change: FavoriteChange) -> Self {
        match change {
            FavoriteChange::Added => Self::success("Added to favorites!"),
            FavoriteChange::AlreadyPresent => Self::info("Already in favorites"),
            FavoriteChange::Removed => Self::warning("Removed from favorites!"),
            FavoriteChange::Cleared => Self::warning("All favorites have been cleared!"),
            FavoriteChange::Unchanged => Self::info("Favorites unchanged"),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            Level::Success => "[ok]",
            Level::Info => "[info]",
            Level::Warning => "[warn]",
        };
        write!(f, "{tag} {}", self.message)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// One product per line: id, title, price, rating and category.
pub fn product_row(product: &ProductSnapshot) -> String {
    let mut row = format!(
        "#{:<5} {}  {}  * {:.1}",
        product.id.as_i64(),
        product.title,
        product.price,
        product.display_rating()
    );
    if let Some(category) = product.category_name() {
        let _ = write!(row, "  [{category}]");
    }
    row
}

/// A product list with an optional page selector.
pub fn product_list(products: &[ProductSnapshot], page: Option<Pagination>) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }
    let mut out = String::new();
    for product in products {
        let _ = writeln!(out, "{}", product_row(product));
    }
    if let Some(page) = page {
        let _ = writeln!(out, "\n{}", page_selector(&page, page.has_more(products.len())));
    }
    out
}

/// Page buttons, e.g. `1 ... 6 [7] 8`.
pub fn page_selector(page: &Pagination, has_more: bool) -> String {
    page.window(has_more)
        .iter()
        .map(|link| match link {
            PageLink::Page {
                number,
                current: true,
            } => format!("[{number}]"),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full product page with related products.
pub fn product_detail(
    product: &ProductSnapshot,
    related: &[ProductSnapshot],
    shop: &ShopState,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.title);
    let _ = writeln!(out, "{}", "=".repeat(product.title.chars().count()));
    let _ = writeln!(out, "Price:    {}", product.price);
    let _ = writeln!(out, "Rating:   {:.1}", product.display_rating());
    if let Some(category) = product.category_name() {
        let _ = writeln!(out, "Category: {category}");
    }
    if let Some(image) = product.primary_image() {
        let _ = writeln!(out, "Image:    {image}");
    }
    let quantity = shop.item_quantity(product.id);
    if quantity > 0 {
        let _ = writeln!(out, "In cart:  {quantity}");
    }
    if shop.is_in_favorites(product.id) {
        let _ = writeln!(out, "In favorites");
    }
    if let Some(description) = product.description.as_deref() {
        let _ = writeln!(out, "\n{description}");
    }
    let others: Vec<_> = related.iter().filter(|p| p.id != product.id).collect();
    if !others.is_empty() {
        let _ = writeln!(out, "\nRelated products:");
        for other in others {
            let _ = writeln!(out, "  {}", product_row(other));
        }
    }
    out
}

/// Category list, marking categories without a usable image.
pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }
    let mut out = String::new();
    for category in categories {
        let image = category
            .valid_image()
            .map_or_else(|| format!("({})", category.initial()), str::to_string);
        let _ = writeln!(out, "#{:<5} {}  {image}", category.id.as_i64(), category.name);
    }
    out
}

/// Search results for `query`.
pub fn search_results(query: &str, matches: &[&ProductSnapshot]) -> String {
    if matches.is_empty() {
        return format!("No products match \"{}\".\n", query.trim());
    }
    let mut out = format!("{} result(s) for \"{}\":\n", matches.len(), query.trim());
    for product in matches {
        let _ = writeln!(out, "{}", product_row(product));
    }
    out
}

/// Flash sale listing with the countdown.
pub fn flash_sale(products: &[&ProductSnapshot], countdown: Countdown) -> String {
    let mut out = format!("Flash sale ends in {countdown}\n\n");
    if products.is_empty() {
        out.push_str("No products on sale right now.\n");
        return out;
    }
    for product in products {
        let _ = writeln!(out, "{}", product_row(product));
    }
    out
}

// =============================================================================
// Cart and wishlist
// =============================================================================

/// Cart lines followed by the order summary.
pub fn cart(shop: &ShopState) -> String {
    let cart = shop.cart();
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for line in cart.items() {
        let _ = writeln!(
            out,
            "#{:<5} {}  {} x {} = {}",
            line.product_id().as_i64(),
            line.product.title,
            line.product.price,
            line.quantity,
            line.line_total()
        );
    }
    out.push('\n');
    out.push_str(&order_summary(&shop.order_summary()));
    out
}

/// Subtotal, shipping, tax and total.
pub fn order_summary(summary: &OrderSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Items:    {}", summary.item_count);
    let _ = writeln!(out, "Subtotal: {}", summary.subtotal);
    let _ = writeln!(out, "Shipping: Free");
    let _ = writeln!(out, "Tax:      {}", summary.tax);
    let _ = writeln!(out, "Total:    {}", summary.total);
    let _ = writeln!(
        out,
        "Free shipping on orders over {}",
        Price::from_dollars(FREE_SHIPPING_THRESHOLD_DOLLARS)
    );
    out
}

/// Wishlist entries.
pub fn wishlist(favorites: &Favorites) -> String {
    if favorites.is_empty() {
        return "Your wishlist is empty.\n".to_string();
    }
    let mut out = String::new();
    for entry in favorites.items() {
        let _ = writeln!(out, "{}", product_row(&entry.product));
    }
    let _ = writeln!(out, "\n{} item(s)", favorites.len());
    out
}

// =============================================================================
// Account
// =============================================================================

/// Profile card.
pub fn profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "({}) {}", profile.initial(), profile.name);
    let _ = writeln!(out, "Email:  {}", profile.email);
    if let Some(role) = profile.role.as_deref() {
        let _ = writeln!(out, "Role:   {role}");
    }
    if let Some(avatar) = profile.avatar.as_deref() {
        let _ = writeln!(out, "Avatar: {avatar}");
    }
    out
}
