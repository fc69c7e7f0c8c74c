//! GNews search client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_status, http_client, ProviderError};
use crate::{config::NewsConfig, models::Headline};

/// Headlines kept from one search.
pub const MAX_HEADLINES: usize = 5;

/// Article count and sample headlines for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsSearch {
    pub total_articles: u64,
    pub headlines: Vec<Headline>,
}

#[async_trait]
pub trait NewsClient: Send + Sync {
    /// Search for articles mentioning `name` as an exact phrase, published since `from`.
    async fn search(&self, name: &str, from: DateTime<Utc>) -> Result<NewsSearch, ProviderError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchResponse {
    total_articles: u64,
    articles: Vec<Article>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Article {
    title: String,
    url: String,
    published_at: String,
    source: ArticleSource,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticleSource {
    name: String,
}

impl Article {
    fn into_headline(self) -> Headline {
        Headline {
            title: self.title,
            source: self.source.name,
            date: self.published_at,
            url: self.url,
        }
    }
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: String,
    lang: &'a str,
    country: &'a str,
    from: String,
    max: u32,
    apikey: &'a str,
}

pub struct GNewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    lang: String,
    country: String,
    max_results: u32,
}

impl GNewsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            lang: "en".to_string(),
            country: "us".to_string(),
            max_results: 10,
        }
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &NewsConfig) -> Result<Self, ProviderError> {
        let mut client = Self::with_client(
            http_client(config.timeout_secs)?,
            config.base_url.trim_end_matches('/'),
            config.api_key.clone(),
        );
        client.lang.clone_from(&config.lang);
        client.country.clone_from(&config.country);
        client.max_results = config.max_results;
        Ok(client)
    }
}

#[async_trait]
impl NewsClient for GNewsClient {
    async fn search(&self, name: &str, from: DateTime<Utc>) -> Result<NewsSearch, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("GNews"));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&SearchQuery {
                q: format!("\"{name}\""),
                lang: &self.lang,
                country: &self.country,
                from: from.format("%Y-%m-%dT00:00:00Z").to_string(),
                max: self.max_results,
                apikey: &self.api_key,
            })
            .send()
            .await?;

        let body: SearchResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(ProviderError::Decode)?;

        Ok(NewsSearch {
            total_articles: body.total_articles,
            headlines: body
                .articles
                .into_iter()
                .take(MAX_HEADLINES)
                .map(Article::into_headline)
                .collect(),
        })
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

    use super::{NewsClient, NewsSearch, ProviderError};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Queued-response news client. An empty queue answers an empty search.
    #[derive(Default)]
    pub struct MockNewsClient {
        results: Mutex<VecDeque<Result<NewsSearch, ProviderError>>>,
        calls: Mutex<Vec<(String, DateTime<Utc>)>>,
    }

    impl MockNewsClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_result(&self, result: Result<NewsSearch, ProviderError>) {
            self.results.lock().unwrap().push_back(result);
        }

        /// `(name, from)` pairs passed to `search`.
        pub fn calls(&self) -> Vec<(String, DateTime<Utc>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsClient for MockNewsClient {
        async fn search(
            &self,
            name: &str,
            from: DateTime<Utc>,
        ) -> Result<NewsSearch, ProviderError> {
            self.calls.lock().unwrap().push((name.to_string(), from));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(NewsSearch::default()))
        }
    }
}
