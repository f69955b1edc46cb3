//! Application root: the shared services a command works with.

use std::sync::Arc;

use tracing::debug;

use crate::accounts::AccountService;
use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::session::SessionStore;
use crate::shop::ShopState;
use crate::storage::{FileStore, SharedStore};

/// Services shared by everything a command does.
///
/// Cheap to clone via `Arc`. The cart and wishlist container is not part of
/// it: it is created per command with [`AppState::open_shop`] and owned by
/// the caller.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: SharedStore,
    api: ApiClient,
    session: SessionStore,
    accounts: AccountService,
}

impl AppState {
    /// Create state backed by the on-disk store in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let store = FileStore::open(&config.data_dir, Some(config.storage_quota_bytes))?;
        debug!(data_dir = %config.data_dir.display(), "Local store opened");
        Self::with_store(config, Arc::new(store))
    }

    /// Create state over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(config: StorefrontConfig, store: SharedStore) -> Result<Self> {
        let api = ApiClient::from_config(&config)?;
        let session = SessionStore::new(Arc::clone(&store));
        let accounts = AccountService::new(api.clone(), session.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                api,
                session,
                accounts,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the local key-value store.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    /// Get a reference to the remote API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session token store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Create a hydrated cart and wishlist container gated on the session.
    #[must_use]
    pub fn open_shop(&self) -> ShopState {
        ShopState::open(
            Arc::clone(&self.inner.store),
            Arc::new(self.inner.session.clone()),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
