//! Postal-code to representative lookup (`whoismyrepresentative.com` format).

use async_trait::async_trait;
use serde::Deserialize;

use super::{check_status, http_client, ProviderError};
use crate::{config::ZipLookupConfig, models::ZipLookupResult};

#[async_trait]
pub trait ZipLookupClient: Send + Sync {
    /// Representatives serving a five-digit postal code.
    async fn lookup(&self, zip: &str) -> Result<Vec<ZipLookupResult>, ProviderError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LookupResponse {
    results: Vec<ZipLookupResult>,
}

pub struct HttpZipLookupClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpZipLookupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ZipLookupConfig) -> Result<Self, ProviderError> {
        Ok(Self::with_client(
            http_client(config.timeout_secs)?,
            config.base_url.trim_end_matches('/'),
        ))
    }
}

#[async_trait]
impl ZipLookupClient for HttpZipLookupClient {
    async fn lookup(&self, zip: &str) -> Result<Vec<ZipLookupResult>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/getall_mems.php", self.base_url))
            .query(&[("zip", zip), ("output", "json")])
            .send()
            .await?;

        let body: LookupResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(ProviderError::Decode)?;
        Ok(body.results)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{ProviderError, ZipLookupClient, ZipLookupResult};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Queued-response lookup client. An empty queue answers no results.
    #[derive(Default)]
    pub struct MockZipLookupClient {
        results: Mutex<VecDeque<Result<Vec<ZipLookupResult>, ProviderError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockZipLookupClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_result(&self, result: Result<Vec<ZipLookupResult>, ProviderError>) {
            self.results.lock().unwrap().push_back(result);
        }

        /// Postal codes passed to `lookup`.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ZipLookupClient for MockZipLookupClient {
        async fn lookup(&self, zip: &str) -> Result<Vec<ZipLookupResult>, ProviderError> {
            self.calls.lock().unwrap().push(zip.to_string());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
