//! Clients for the live third-party APIs proxied by the service.
//!
//! - [`news`] - GNews article search
//! - [`video`] - YouTube Data API video search
//! - [`zip`] - postal-code to representative lookup
//!
//! Each provider follows the same shape as the Congress.gov client: a trait,
//! a reqwest-backed implementation and a queued-response mock behind
//! `test-utils`.

pub mod news;
pub mod video;
pub mod zip;

use std::time::Duration;

use thiserror::Error;

pub use news::{GNewsClient, NewsClient, NewsSearch};
pub use video::{VideoClient, YouTubeClient};
pub use zip::{HttpZipLookupClient, ZipLookupClient};

/// Errors returned by the provider clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider returned a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    /// No API key configured for a provider that needs one
    #[error("{0} API key is not configured")]
    NotConfigured(&'static str),
}

/// Build a reqwest client with a fixed per-request timeout.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Map non-success statuses to `ProviderError`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
