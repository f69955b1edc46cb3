//! Session tokens and the login gate.
//!
//! The account API hands out a bearer token pair on login. Both tokens live
//! in local storage under [`keys::ACCESS_TOKEN`] and [`keys::REFRESH_TOKEN`];
//! the presence of an access token is what "logged in" means everywhere in
//! the storefront.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::storage::{SharedStore, StorageError, keys};

/// Values older clients wrote on logout instead of deleting the key.
const CLEARED_SENTINELS: &[&str] = &["null", "undefined"];

/// Decides whether mutating cart and wishlist operations may run.
pub trait AuthGate: Send + Sync {
    /// Whether a session token is currently present.
    fn is_authenticated(&self) -> bool;
}

/// Shared handle to an [`AuthGate`].
pub type SharedGate = Arc<dyn AuthGate>;

/// Access and refresh tokens returned by a successful login.
///
/// Implements `Debug` manually to redact both tokens.
#[derive(Clone)]
pub struct TokenPair {
    /// Bearer token for authenticated API calls.
    pub access_token: SecretString,
    /// Token used to obtain a new access token.
    pub refresh_token: SecretString,
}

impl TokenPair {
    /// Create a token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Token storage backed by the local key-value store.
///
/// Tokens are read from storage on every call, so a login performed by
/// another process sharing the data directory is picked up immediately.
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    /// Create a session store over `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The current access token, if logged in.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read_token(keys::ACCESS_TOKEN)
    }

    /// The current refresh token, if logged in.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read_token(keys::REFRESH_TOKEN)
    }

    /// Persist a freshly issued token pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either token cannot be written.
    pub fn save_tokens(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.store
            .set_item(keys::ACCESS_TOKEN, tokens.access_token.expose_secret())?;
        self.store
            .set_item(keys::REFRESH_TOKEN, tokens.refresh_token.expose_secret())?;
        info!("Session started");
        Ok(())
    }

    /// Forget both tokens.
    ///
    /// The cart and wishlist are left in place; they simply become read-only
    /// until the next login.
    ///
    /// # Errors
    ///
    /// Returns an error if the keys cannot be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.store.remove_item(keys::ACCESS_TOKEN)?;
        self.store.remove_item(keys::REFRESH_TOKEN)?;
        info!("Session ended");
        Ok(())
    }

    fn read_token(&self, key: &str) -> Option<SecretString> {
        match self.store.get_item(key) {
            Ok(Some(raw)) => {
                let token = raw.trim();
                if token.is_empty() || CLEARED_SENTINELS.contains(&token) {
                    None
                } else {
                    Some(SecretString::from(token.to_string()))
                }
            }
            Ok(None) => None,
            Err(e) => {
                debug!(key, error = %e, "Failed to read session token");
                None
            }
        }
    }
}

impl AuthGate for SessionStore {
    fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
