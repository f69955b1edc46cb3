//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageError, validate_key};

/// A [`KeyValueStore`] backed by a `HashMap`.
///
/// Usage is counted as key bytes plus value bytes, the same way
/// [`FileStore`](super::FileStore) counts file contents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryStore {
    /// Create an empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `bytes`.
    #[must_use]
    pub fn with_quota(bytes: u64) -> Self {
        Self {
            items: RwLock::default(),
            quota: Some(bytes),
        }
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.items.read().map_err(|_| StorageError::Poisoned)?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;

        if let Some(limit) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let projected = (others + key.len() + value.len()) as u64;
            if projected > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.items
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .clear();
        Ok(())
    }
}
