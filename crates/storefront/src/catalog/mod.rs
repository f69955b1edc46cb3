//! Catalog helpers used between the API client and presentation.

pub mod flash_sale;
pub mod pagination;
pub mod search;

pub use flash_sale::{Countdown, SALE_LIMIT, SALE_PRICE_CEILING, sale_products};
pub use pagination::{DEFAULT_LIMIT, PageLink, Pagination};
pub use search::search_by_title;
