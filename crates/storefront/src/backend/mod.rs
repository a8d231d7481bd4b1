//! HTTP client for the Vesta catalog REST API.
//!
//! # Architecture
//!
//! - REST + JSON over `reqwest`; the backend is the source of truth
//! - List responses and single products are memoized independently via
//!   `moka`; entries live for the lifetime of the client and are patched in
//!   place after mutations rather than expired
//! - Product images are uploaded as multipart requests before the product
//!   write that references them
//!
//! # Example
//!
//! ```rust,ignore
//! use vesta_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.api);
//!
//! // First call fetches, second call is served from the cache
//! let page = client.get_products(None, None, None).await?;
//! let page = client.get_products(None, None, None).await?;
//! ```

mod auth;
mod cache;
mod products;
pub mod types;
mod uploads;

pub use products::DEFAULT_LIMIT;
pub use types::*;

use std::sync::Arc;

use moka::future::Cache;
use thiserror::Error;

use crate::config::ApiConfig;
use cache::ListKey;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether the backend reported a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }

    /// Whether the backend rejected the caller's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Api { status, .. } if *status == reqwest::StatusCode::UNAUTHORIZED
        )
    }
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the catalog backend REST API.
///
/// Cheaply cloneable. List and single-product responses are memoized for the
/// lifetime of the client instance; mutation calls patch the memoized entries
/// in place.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    lists: Cache<ListKey, ProductsResponse>,
    products: Cache<String, Product>,
}

impl BackendClient {
    /// Create a new backend API client with empty caches.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let lists = Cache::builder().max_capacity(1_000).build();
        let products = Cache::builder().max_capacity(10_000).build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                lists,
                products,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Decode a response body, mapping non-success statuses to
    /// [`BackendError::Api`].
    ///
    /// The body is read as text first so parse failures can be logged with
    /// their offending payload.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status,
                message: api_error_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }
}

/// Extract a human-readable message from an error body.
///
/// The backend reports errors as `{"message": ...}` where the message is
/// either a string or an array of strings; anything else falls back to the
/// status reason.
fn api_error_message(body: &str, status: reqwest::StatusCode) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<serde_json::Value>,
    }

    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    };

    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return fallback();
    };

    match parsed.message {
        Some(serde_json::Value::String(message)) => message,
        Some(serde_json::Value::Array(parts)) => {
            let messages: Vec<String> = parts
                .into_iter()
                .filter_map(|part| match part {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            if messages.is_empty() {
                fallback()
            } else {
                messages.join("; ")
            }
        }
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "slug already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (400 Bad Request): slug already exists"
        );
    }

    #[test]
    fn test_is_not_found() {
        let err = BackendError::Api {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "Product not found".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_api_error_message_string() {
        let message =
            api_error_message(r#"{"message":"Unauthorized"}"#, reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Unauthorized");
    }

    #[test]
    fn test_api_error_message_array() {
        let message = api_error_message(
            r#"{"message":["title must be a string","slug must match pattern"]}"#,
            reqwest::StatusCode::BAD_REQUEST,
        );
        assert_eq!(message, "title must be a string; slug must match pattern");
    }

    #[test]
    fn test_api_error_message_fallback() {
        let message = api_error_message("<html>oops</html>", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(message, "Bad Gateway");
    }
}
