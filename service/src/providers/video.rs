//! YouTube Data API search client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{check_status, http_client, ProviderError};
use crate::{config::VideoConfig, models::Video};

#[async_trait]
pub trait VideoClient: Send + Sync {
    /// Search for videos matching `query`, newest relevance-ranked first.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>, ProviderError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    url: String,
}

impl SearchItem {
    /// Results without a video id (channels, playlists) are dropped.
    fn into_video(self) -> Option<Video> {
        let video_id = self.id.video_id.filter(|id| !id.is_empty())?;
        let thumbnail = self
            .snippet
            .thumbnails
            .medium
            .or(self.snippet.thumbnails.default)
            .map(|thumb| thumb.url);
        Some(Video {
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            video_id,
            title: self.snippet.title,
            channel: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            thumbnail,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery<'a> {
    part: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    q: &'a str,
    max_results: u32,
    key: &'a str,
}

pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
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
        }
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &VideoConfig) -> Result<Self, ProviderError> {
        Ok(Self::with_client(
            http_client(config.timeout_secs)?,
            config.base_url.trim_end_matches('/'),
            config.api_key.clone(),
        ))
    }
}

#[async_trait]
impl VideoClient for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("YouTube"));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&SearchQuery {
                part: "snippet",
                kind: "video",
                q: query,
                max_results,
                key: &self.api_key,
            })
            .send()
            .await?;

        let body: SearchResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(ProviderError::Decode)?;

        Ok(body
            .items
            .into_iter()
            .filter_map(SearchItem::into_video)
            .take(max_results as usize)
            .collect())
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

    use super::{ProviderError, Video, VideoClient};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Queued-response video client. An empty queue answers no videos.
    #[derive(Default)]
    pub struct MockVideoClient {
        results: Mutex<VecDeque<Result<Vec<Video>, ProviderError>>>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl MockVideoClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_result(&self, result: Result<Vec<Video>, ProviderError>) {
            self.results.lock().unwrap().push_back(result);
        }

        /// `(query, max_results)` pairs passed to `search`.
        pub fn calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VideoClient for MockVideoClient {
        async fn search(
            &self,
            query: &str,
            max_results: u32,
        ) -> Result<Vec<Video>, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
