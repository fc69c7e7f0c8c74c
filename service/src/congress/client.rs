//! Congress.gov client for member legislation lists.
//!
//! This module provides a trait-based HTTP client for the Congress.gov v3
//! API. The trait abstraction enables:
//!
//! - Easy mocking in unit tests
//! - HTTP-level testing with `MockHttpServer` in integration tests
//!
//! # Example
//!
//! ```ignore
//! use civicdata_api::congress::{CongressApiClient, HttpCongressClient, LegislationKind};
//!
//! let client = HttpCongressClient::new("https://api.congress.gov/v3", "my-api-key");
//! let page = client
//!     .list_legislation(LegislationKind::Sponsored, "P000145", 20, 0)
//!     .await?;
//! println!("{} sponsored bills", page.pagination.count);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::types::{LegislationKind, LegislationPage};
use crate::config::CongressConfig;

/// Errors that can occur when calling the Congress API.
#[derive(Debug, Error)]
pub enum CongressApiError {
    /// HTTP request failed (connection, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Member not found
    #[error("Member not found: {0}")]
    NotFound(String),

    /// Too many requests
    #[error("Congress.gov rate limit exceeded")]
    RateLimited,

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Trait for Congress API operations.
///
/// Use `HttpCongressClient` for real HTTP calls, or `mock::MockCongressClient`
/// in tests.
#[async_trait]
pub trait CongressApiClient: Send + Sync {
    /// Fetch one page of a member's sponsored or cosponsored legislation.
    async fn list_legislation(
        &self,
        kind: LegislationKind,
        bioguide_id: &str,
        limit: u32,
        offset: u64,
    ) -> Result<LegislationPage, CongressApiError>;
}

#[derive(Serialize)]
struct PageQuery {
    format: &'static str,
    limit: u32,
    offset: u64,
}

/// HTTP-based implementation of `CongressApiClient`.
pub struct HttpCongressClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCongressClient {
    /// Create a new client with the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client with a custom `reqwest::Client` (for testing with custom config).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &CongressConfig) -> Result<Self, CongressApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(
            client,
            config.base_url.trim_end_matches('/'),
            config.api_key.clone(),
        ))
    }
}

#[async_trait]
impl CongressApiClient for HttpCongressClient {
    async fn list_legislation(
        &self,
        kind: LegislationKind,
        bioguide_id: &str,
        limit: u32,
        offset: u64,
    ) -> Result<LegislationPage, CongressApiError> {
        let url = format!(
            "{}/member/{}/{}",
            self.base_url,
            bioguide_id,
            kind.path_segment()
        );

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .query(&PageQuery {
                format: "json",
                limit,
                offset,
            })
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CongressApiError::NotFound(bioguide_id.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CongressApiError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CongressApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(CongressApiError::Decode)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{CongressApiClient, CongressApiError, LegislationKind, LegislationPage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One recorded `list_legislation` call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LegislationCall {
        pub kind: LegislationKind,
        pub bioguide_id: String,
        pub limit: u32,
        pub offset: u64,
    }

    /// Mock implementation of `CongressApiClient` for unit tests.
    ///
    /// Queue responses per list with `push_sponsored` / `push_cosponsored`;
    /// they are returned in order. An empty queue answers `NotFound`.
    pub struct MockCongressClient {
        sponsored: Mutex<VecDeque<Result<LegislationPage, CongressApiError>>>,
        cosponsored: Mutex<VecDeque<Result<LegislationPage, CongressApiError>>>,
        calls: Mutex<Vec<LegislationCall>>,
    }

    impl MockCongressClient {
        pub fn new() -> Self {
            Self {
                sponsored: Mutex::new(VecDeque::new()),
                cosponsored: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue the next sponsored-legislation response.
        pub fn push_sponsored(&self, result: Result<LegislationPage, CongressApiError>) {
            self.sponsored.lock().unwrap().push_back(result);
        }

        /// Queue the next cosponsored-legislation response.
        pub fn push_cosponsored(&self, result: Result<LegislationPage, CongressApiError>) {
            self.cosponsored.lock().unwrap().push_back(result);
        }

        /// All calls made so far, in order.
        pub fn calls(&self) -> Vec<LegislationCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Calls made for one list.
        pub fn calls_for(&self, kind: LegislationKind) -> Vec<LegislationCall> {
            self.calls()
                .into_iter()
                .filter(|call| call.kind == kind)
                .collect()
        }
    }

    impl Default for MockCongressClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CongressApiClient for MockCongressClient {
        async fn list_legislation(
            &self,
            kind: LegislationKind,
            bioguide_id: &str,
            limit: u32,
            offset: u64,
        ) -> Result<LegislationPage, CongressApiError> {
            self.calls.lock().unwrap().push(LegislationCall {
                kind,
                bioguide_id: bioguide_id.to_string(),
                limit,
                offset,
            });

            let queue = match kind {
                LegislationKind::Sponsored => &self.sponsored,
                LegislationKind::Cosponsored => &self.cosponsored,
            };
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CongressApiError::NotFound(bioguide_id.to_string())))
        }
    }
}
