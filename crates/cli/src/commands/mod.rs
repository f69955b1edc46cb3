//! Command implementations.
//!
//! Each command returns the text to print; `main` writes it and maps errors
//! to an exit code.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod wishlist;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use storepilot_storefront::AppState;
    use storepilot_storefront::config::StorefrontConfig;
    use storepilot_storefront::storage::MemoryStore;

    /// State over an in-memory store whose API points at a closed port.
    pub fn offline_state() -> AppState {
        let data_dir = std::env::temp_dir().to_string_lossy().into_owned();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREPILOT_API_BASE_URL" => Some("http://127.0.0.1:9/api/v1/".to_string()),
            "STOREPILOT_DATA_DIR" => Some(data_dir.clone()),
            "STOREPILOT_HTTP_TIMEOUT_SECS" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        AppState::with_store(config, Arc::new(MemoryStore::new())).unwrap()
    }
}
