//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREPILOT_API_BASE_URL` - Catalog and account API root
//!   (default: `https://api.escuelajs.co/api/v1/`)
//! - `STOREPILOT_DATA_DIR` - Where the cart, wishlist and tokens are stored
//!   (default: the platform data directory plus `storepilot`)
//! - `STOREPILOT_PAGE_SIZE` - Products per catalog page (default: 12)
//! - `STOREPILOT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `STOREPILOT_STORAGE_QUOTA_BYTES` - Local storage quota (default: 5 MiB)
//! - `STOREPILOT_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::storage::DEFAULT_QUOTA_BYTES;

const DEFAULT_API_BASE_URL: &str = "https://api.escuelajs.co/api/v1/";
const DEFAULT_PAGE_SIZE: u32 = 12;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DATA_DIR_NAME: &str = "storepilot";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format for the CLI subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Storefront configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Root of the remote API, always ending in `/`.
    pub api_base_url: Url,
    /// Directory for the local key-value store.
    pub data_dir: PathBuf,
    /// Products per catalog page.
    pub page_size: u32,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Local storage quota in bytes.
    pub storage_quota_bytes: u64,
    /// Log output format.
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<SecretString>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("data_dir", &self.data_dir)
            .field("page_size", &self.page_size)
            .field("http_timeout", &self.http_timeout)
            .field("storage_quota_bytes", &self.storage_quota_bytes)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value, or if
    /// no data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = parse_base_url(
            "STOREPILOT_API_BASE_URL",
            get("STOREPILOT_API_BASE_URL")
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;

        let data_dir = match get("STOREPILOT_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join(DATA_DIR_NAME))
                .ok_or_else(|| ConfigError::MissingEnvVar("STOREPILOT_DATA_DIR".to_string()))?,
        };

        let page_size = parse_or_default(
            "STOREPILOT_PAGE_SIZE",
            get("STOREPILOT_PAGE_SIZE"),
            DEFAULT_PAGE_SIZE,
        )?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREPILOT_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let http_timeout = Duration::from_secs(parse_or_default(
            "STOREPILOT_HTTP_TIMEOUT_SECS",
            get("STOREPILOT_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        let storage_quota_bytes = parse_or_default(
            "STOREPILOT_STORAGE_QUOTA_BYTES",
            get("STOREPILOT_STORAGE_QUOTA_BYTES"),
            DEFAULT_QUOTA_BYTES,
        )?;

        let log_format = parse_or_default(
            "STOREPILOT_LOG_FORMAT",
            get("STOREPILOT_LOG_FORMAT"),
            LogFormat::default(),
        )?;

        let sentry_dsn = get("SENTRY_DSN").map(SecretString::from);

        Ok(Self {
            api_base_url,
            data_dir,
            page_size,
            http_timeout,
            storage_quota_bytes,
            log_format,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, adding the trailing slash `Url::join` needs.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse an optional value, falling back to `default` when unset.
fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("STOREPILOT_DATA_DIR", "/tmp/storepilot")]).unwrap();
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.storage_quota_bytes, DEFAULT_QUOTA_BYTES);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = load(&[
            ("STOREPILOT_DATA_DIR", "/tmp/storepilot"),
            ("STOREPILOT_API_BASE_URL", "http://127.0.0.1:8080/api/v1"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8080/api/v1/");
        assert_eq!(
            config.api_base_url.join("products").unwrap().as_str(),
            "http://127.0.0.1:8080/api/v1/products"
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("STOREPILOT_API_BASE_URL", "not a url"),
            ("STOREPILOT_API_BASE_URL", "ftp://example.com/"),
            ("STOREPILOT_PAGE_SIZE", "zero"),
            ("STOREPILOT_PAGE_SIZE", "0"),
            ("STOREPILOT_HTTP_TIMEOUT_SECS", "-1"),
            ("STOREPILOT_LOG_FORMAT", "xml"),
        ] {
            let result = load(&[("STOREPILOT_DATA_DIR", "/tmp/storepilot"), (key, value)]);
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvVar(ref k, _)) if k == key),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[
            ("STOREPILOT_DATA_DIR", "/tmp/storepilot"),
            ("STOREPILOT_PAGE_SIZE", "  "),
        ])
        .unwrap();
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_json_log_format() {
        let config = load(&[
            ("STOREPILOT_DATA_DIR", "/tmp/storepilot"),
            ("STOREPILOT_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let config = load(&[
            ("STOREPILOT_DATA_DIR", "/tmp/storepilot"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("key@sentry"));
    }
}
