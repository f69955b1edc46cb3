//! Client for the remote catalog and account API.
//!
//! Plain JSON over HTTP with `reqwest`. Catalog reads are cached with `moka`:
//! products for 5 minutes, categories for an hour.

mod account;
mod cache;
mod catalog;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::config::StorefrontConfig;

use cache::{CacheKey, CacheValue};

/// API message that signals a duplicate signup email.
const DUPLICATE_EMAIL_MESSAGE: &str = "email must be unique";

/// How much of an unexpected body ends up in logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, expired or wrong credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The request clashes with existing data, e.g. a taken email.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: u16,
        /// Message from the API, or the raw body.
        message: String,
    },

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the remote storefront API.
///
/// Cheap to clone; clones share the connection pool and caches.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<CacheKey, CacheValue>,
    categories: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("storepilot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        let categories = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(3600)) // 1 hour
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                products,
                categories,
            }),
        })
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.http_timeout)
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve `path` against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and decode a JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        bearer: Option<&SecretString>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let path = url.path().to_string();
        let mut request = self.inner.client.request(method, url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &path, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(
                error = %e,
                path = %path,
                body = %text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.execute(Method::GET, url, None, None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Map a non-success response to an [`ApiError`].
fn status_error(status: StatusCode, path: &str, body: &str) -> ApiError {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .map_or_else(|| body.chars().take(200).collect(), str::to_string)
    });

    match status {
        StatusCode::NOT_FOUND => {
            debug!(path, "API resource not found");
            ApiError::NotFound(path.to_string())
        }
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        _ if message.contains(DUPLICATE_EMAIL_MESSAGE) => ApiError::Conflict(message),
        _ => {
            error!(
                status = %status,
                path,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "API returned non-success status"
            );
            ApiError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Pull the `message` field out of an error body.
///
/// The API sends either a string or a list of validation strings.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}
