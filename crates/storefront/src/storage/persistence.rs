//! Best-effort JSON persistence of ordered collections.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::SharedStore;

/// Loads and saves JSON arrays under well-known keys.
///
/// Nothing here returns an error. Corrupt data is deleted and read back as an
/// empty list; failed writes are logged and dropped. The in-memory collection
/// stays the source of truth for the rest of the session either way.
#[derive(Clone)]
pub struct LocalPersistence {
    store: SharedStore,
}

impl LocalPersistence {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Read the list stored at `key`.
    ///
    /// Returns an empty list when the key is unset, unreadable, or holds
    /// something that is not a JSON array of `T`. In the last case the key is
    /// removed so the next load starts clean.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted data");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(key, count = items.len(), "Loaded persisted collection");
                items
            }
            Err(e) => {
                warn!(key, error = %e, "Discarding corrupt persisted data");
                if let Err(e) = self.store.remove_item(key) {
                    warn!(key, error = %e, "Failed to remove corrupt persisted data");
                }
                Vec::new()
            }
        }
    }

    /// Overwrite `key` with `items` serialized as a JSON array.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) {
        let raw = match serde_json::to_string(items) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize collection");
                return;
            }
        };

        if let Err(e) = self.store.set_item(key, &raw) {
            warn!(key, error = %e, "Failed to persist collection");
        }
    }
}

impl std::fmt::Debug for LocalPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPersistence").finish_non_exhaustive()
    }
}
