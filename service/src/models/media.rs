//! Video, news and postal-code lookup payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::person::Person;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub published_at: String,
    pub thumbnail: Option<String>,
    pub url: String,
}

/// Stored in `video_cache`, keyed by bioguide id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoCacheEntry {
    pub bioguide_id: String,
    pub search_query: String,
    pub videos: Vec<Video>,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoList {
    pub bioguide_id: String,
    pub search_query: String,
    pub videos: Vec<Video>,
    pub cached_at: DateTime<Utc>,
    pub cached: bool,
}

impl VideoList {
    #[must_use]
    pub fn from_entry(entry: VideoCacheEntry, cached: bool) -> Self {
        Self {
            bioguide_id: entry.bioguide_id,
            search_query: entry.search_query,
            videos: entry.videos,
            cached_at: entry.cached_at,
            cached,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub date: String,
    pub url: String,
}

/// Stored in `news_cache`, keyed by bioguide id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewsCacheEntry {
    pub bioguide_id: String,
    pub search_query: String,
    pub days_searched: u32,
    pub total_articles: u64,
    pub sample_headlines: Vec<Headline>,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewsSummary {
    pub bioguide_id: String,
    pub search_query: String,
    pub days_searched: u32,
    pub total_articles: u64,
    pub sample_headlines: Vec<Headline>,
    pub cached_at: DateTime<Utc>,
    pub cached: bool,
}

impl NewsSummary {
    #[must_use]
    pub fn from_entry(entry: NewsCacheEntry, cached: bool) -> Self {
        Self {
            bioguide_id: entry.bioguide_id,
            search_query: entry.search_query,
            days_searched: entry.days_searched,
            total_articles: entry.total_articles,
            sample_headlines: entry.sample_headlines,
            cached_at: entry.cached_at,
            cached,
        }
    }
}

/// One representative as reported by the postal-code lookup provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ZipLookupResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FindRepResponse {
    pub zip: String,
    /// Stored people matched to the provider's entries
    pub representatives: Vec<Person>,
    /// Provider entries exactly as returned
    pub raw_results: Vec<ZipLookupResult>,
}
