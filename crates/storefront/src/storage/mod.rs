//! Local key-value storage.
//!
//! The storefront keeps the cart, the wishlist and the session tokens in a
//! small string-to-string store that plays the role a browser's
//! `localStorage` plays for a web client: scoped to one user on one machine,
//! synchronous, and with a size quota.
//!
//! # Implementations
//!
//! - [`FileStore`] - one JSON document per key inside a data directory
//! - [`MemoryStore`] - process-local map, used by tests and dry runs
//!
//! [`LocalPersistence`] sits on top of either and handles (de)serialization
//! with a best-effort, never-fail policy.

mod file;
mod memory;
mod persistence;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::LocalPersistence;

/// Default quota, matching the common browser `localStorage` limit.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Well-known storage keys.
pub mod keys {
    /// Cart line items.
    pub const CART: &str = "cart";

    /// Wishlist entries.
    pub const FAVORITES: &str = "favorites";

    /// Bearer token for the account API.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Refresh token issued alongside the access token.
    pub const REFRESH_TOKEN: &str = "refreshToken";
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing files failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write would push total usage over the quota.
    #[error("storage quota of {limit} bytes exceeded while writing '{key}'")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Configured quota in bytes.
        limit: u64,
    },

    /// The key cannot be used as a storage name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Another thread panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
///
/// Methods take `&self`; implementations use interior mutability so one store
/// can back the cart container and the session at the same time.
pub trait KeyValueStore: Send + Sync {
    /// Read the value at `key`, `None` if unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] if the write would exceed the
    /// quota, or an I/O error if the backing storage cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;
}

/// A store shared between the cart container and the session.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Check that `key` is usable as a file name on every platform.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(keys::CART).is_ok());
        assert!(validate_key(keys::ACCESS_TOKEN).is_ok());
        assert!(validate_key("draft.v2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("with space").is_err());
    }

    #[test]
    fn test_quota_error_display() {
        let err = StorageError::QuotaExceeded {
            key: "cart".to_string(),
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "storage quota of 10 bytes exceeded while writing 'cart'"
        );
    }
}
