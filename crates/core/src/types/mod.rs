//! Core types for StorePilot.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::ProductSnapshot;
