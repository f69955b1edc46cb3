//! Title search over an already fetched product list.

use storepilot_core::ProductSnapshot;

/// Products whose title contains `query`, ignoring case, in catalog order.
///
/// A blank query matches nothing.
#[must_use]
pub fn search_by_title<'a>(
    products: &'a [ProductSnapshot],
    query: &str,
) -> Vec<&'a ProductSnapshot> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use storepilot_core::{Price, ProductId};

    use super::*;

    fn catalog() -> Vec<ProductSnapshot> {
        ["Classic Red Shirt", "Blue Jeans", "Red Sneakers"]
            .into_iter()
            .zip(1..)
            .map(|(title, id)| {
                ProductSnapshot::new(ProductId::new(id), title, Price::from_dollars(10))
            })
            .collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let products = catalog();
        let titles: Vec<_> = search_by_title(&products, "RED")
            .into_iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["Classic Red Shirt", "Red Sneakers"]);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let products = catalog();
        assert!(search_by_title(&products, "").is_empty());
        assert!(search_by_title(&products, "   ").is_empty());
    }

    #[test]
    fn test_no_match() {
        assert!(search_by_title(&catalog(), "hat").is_empty());
    }
}
