//! Product categories as returned by the catalog API.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Thumbnail URL. The API sometimes sends junk such as `"null"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Category {
    /// First letter of the name, upper-cased, for image-less thumbnails.
    ///
    /// Returns `'?'` for an empty name.
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }

    /// The thumbnail URL, if it looks usable.
    #[must_use]
    pub fn valid_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != "null" && *url != "undefined")
    }

    /// Whether [`Self::valid_image`] has a value.
    #[must_use]
    pub fn has_valid_image(&self) -> bool {
        self.valid_image().is_some()
    }
}
