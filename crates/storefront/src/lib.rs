//! StorePilot storefront library.
//!
//! Everything behind the `storepilot` command: the cart and wishlist
//! container with its local persistence, the session gate, the remote API
//! client, and catalog helpers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod shop;
pub mod state;
pub mod storage;

pub use error::{Result, StorefrontError};
pub use state::AppState;
