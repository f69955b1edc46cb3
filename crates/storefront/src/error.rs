//! Top-level error type for storefront operations.
//!
//! Module errors convert into [`StorefrontError`] with `?`, so callers such
//! as the CLI handle a single type.

use thiserror::Error;

use crate::accounts::AccountError;
use crate::api::ApiError;
use crate::config::ConfigError;
use crate::shop::ShopError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Account operation failed.
    #[error("{0}")]
    Account(#[from] AccountError),

    /// Cart or wishlist operation was rejected.
    #[error("{0}")]
    Shop(#[from] ShopError),

    /// Local storage could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl StorefrontError {
    /// Whether the error is worth reporting to error tracking.
    ///
    /// User mistakes (bad form input, not logged in, unknown IDs) are not.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::Shop(_) => false,
            Self::Api(err) | Self::Account(AccountError::Api(err)) => matches!(
                err,
                ApiError::Http(_) | ApiError::Parse(_) | ApiError::Status { .. }
            ),
            Self::Account(_) => false,
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after the profile is known to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_passes_user_messages_through() {
        let err = StorefrontError::from(ShopError::LoginRequired);
        assert_eq!(err.to_string(), "you need to log in first");

        let err = StorefrontError::from(AccountError::NameTooShort { min: 3 });
        assert_eq!(err.to_string(), "name must be at least 3 characters");
    }

    #[test]
    fn test_reportable() {
        assert!(!StorefrontError::from(ShopError::LoginRequired).is_reportable());
        assert!(
            !StorefrontError::from(ApiError::NotFound("/products/9".to_string())).is_reportable()
        );
        assert!(
            StorefrontError::from(ApiError::Status {
                status: 500,
                message: "boom".to_string()
            })
            .is_reportable()
        );
        assert!(
            StorefrontError::from(AccountError::Api(ApiError::Status {
                status: 502,
                message: "Bad Gateway".to_string()
            }))
            .is_reportable()
        );
    }
}
