//! StorePilot Core - Shared types library.
//!
//! This crate provides common types used across all StorePilot components:
//! - `storefront` - Client-side storefront engine (cart, wishlist, catalog client)
//! - `cli` - Terminal storefront built on top of the engine
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and the
//!   product/category snapshots returned by the catalog API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
