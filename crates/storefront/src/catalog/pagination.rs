//! Offset pagination over the product list.
//!
//! The API has no total count, so "is there a next page" is guessed from
//! whether the current page came back full.

/// Products per page when nothing else is configured.
pub const DEFAULT_LIMIT: u32 = 12;

/// A 1-based page of `limit` products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number, starting at 1.
    pub page: u32,
    /// Products per page.
    pub limit: u32,
}

/// One button in the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A numbered page.
    Page {
        /// Page number.
        number: u32,
        /// Whether this is the page being shown.
        current: bool,
    },
    /// A gap between the first page and the previous one.
    Ellipsis,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first(DEFAULT_LIMIT)
    }
}

impl Pagination {
    /// Page `page` of size `limit`. Both are clamped to at least 1.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// The first page of size `limit`.
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self::new(1, limit)
    }

    /// Number of products before this page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Whether a page that returned `page_len` products is probably not the last.
    #[must_use]
    pub fn has_more(&self, page_len: usize) -> bool {
        usize::try_from(self.limit).is_ok_and(|limit| page_len == limit)
    }

    /// Whether there is a page before this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// The following page.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
        }
    }

    /// The preceding page, staying on page 1.
    #[must_use]
    pub fn previous(&self) -> Self {
        Self::new(self.page.saturating_sub(1), self.limit)
    }

    /// The page buttons to show around the current page.
    #[must_use]
    pub fn window(&self, has_more: bool) -> Vec<PageLink> {
        let page = |number, current| PageLink::Page { number, current };
        let mut links = Vec::with_capacity(5);

        if self.page > 2 {
            links.push(page(1, false));
        }
        if self.page > 3 {
            links.push(PageLink::Ellipsis);
        }
        if self.page > 1 {
            links.push(page(self.page - 1, false));
        }
        links.push(page(self.page, true));
        if has_more {
            links.push(page(self.page.saturating_add(1), false));
        }
        links
    }
}
