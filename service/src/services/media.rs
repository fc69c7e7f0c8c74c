//! Video and news searches for one person, cached per person for 24h.
//!
//! A provider 404 is an empty result and a 429 is retried once after a pause.
//! Any other provider failure is the request's failure; unlike legislation
//! there is no partial result to fall back on.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::time::sleep;

use super::{cached_document, retry_rate_limited, ServiceError, NEWS_PROVIDER, VIDEO_PROVIDER};
use crate::{
    cache::is_fresh,
    clock::Clock,
    config::{CacheConfig, NewsConfig, VideoConfig},
    models::{NewsCacheEntry, NewsSummary, Person, VideoCacheEntry, VideoList},
    providers::{NewsClient, NewsSearch, ProviderError, VideoClient},
    store::{self, collections, DocumentStore},
};

/// Headlines copied onto the Person document.
pub const PERSON_HEADLINES: usize = 3;

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub ttl: TimeDelta,
    pub video_max_results: u32,
    pub default_news_days: u32,
    pub video_rate_limit_pause: Duration,
    pub news_rate_limit_pause: Duration,
}

impl MediaSettings {
    #[must_use]
    pub fn from_config(cache: &CacheConfig, video: &VideoConfig, news: &NewsConfig) -> Self {
        Self {
            ttl: TimeDelta::hours(i64::from(cache.ttl_hours)),
            video_max_results: video.max_results,
            default_news_days: news.default_days,
            video_rate_limit_pause: Duration::from_secs(video.rate_limit_pause_secs),
            news_rate_limit_pause: Duration::from_secs(news.rate_limit_pause_secs),
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self::from_config(
            &CacheConfig::default(),
            &VideoConfig::default(),
            &NewsConfig::default(),
        )
    }
}

/// Outcome of a bulk news refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsRunReport {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

pub struct MediaService {
    store: Arc<dyn DocumentStore>,
    videos: Arc<dyn VideoClient>,
    news: Arc<dyn NewsClient>,
    clock: Arc<dyn Clock>,
    settings: MediaSettings,
}

impl MediaService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        videos: Arc<dyn VideoClient>,
        news: Arc<dyn NewsClient>,
        clock: Arc<dyn Clock>,
        settings: MediaSettings,
    ) -> Self {
        Self {
            store,
            videos,
            news,
            clock,
            settings,
        }
    }

    #[must_use]
    pub const fn default_news_days(&self) -> u32 {
        self.settings.default_news_days
    }

    async fn require_person(&self, bioguide_id: &str) -> Result<Person, ServiceError> {
        store::get_as::<Person>(self.store.as_ref(), collections::PERSONS, bioguide_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(bioguide_id.to_string()))
    }

    /// Recent videos mentioning the person, searched by display name.
    ///
    /// # Errors
    /// `NotFound` for unknown people; provider and store failures.
    pub async fn videos(&self, bioguide_id: &str, refresh: bool) -> Result<VideoList, ServiceError> {
        let person = self.require_person(bioguide_id).await?;

        if !refresh {
            let cached: Option<VideoCacheEntry> =
                cached_document(self.store.as_ref(), collections::VIDEO_CACHE, bioguide_id)
                    .await?;
            if let Some(entry) = cached.filter(|e| self.fresh(e.cached_at)) {
                return Ok(VideoList::from_entry(entry, true));
            }
        }

        let search_query = person.display_name();
        let (client, query) = (&self.videos, search_query.as_str());
        let max_results = self.settings.video_max_results;
        let outcome = retry_rate_limited(
            VIDEO_PROVIDER,
            self.settings.video_rate_limit_pause,
            move || client.search(query, max_results),
        )
        .await;
        let videos = match outcome {
            Ok(videos) => videos,
            Err(ProviderError::NotFound) => Vec::new(),
            Err(err) => {
                tracing::warn!(bioguide_id, error = %err, "Video search failed");
                return Err(ServiceError::from_provider(VIDEO_PROVIDER, err));
            }
        };

        let entry = VideoCacheEntry {
            bioguide_id: bioguide_id.to_string(),
            search_query,
            videos,
            cached_at: self.clock.now(),
        };
        store::put_as(
            self.store.as_ref(),
            collections::VIDEO_CACHE,
            bioguide_id,
            &entry,
        )
        .await?;

        tracing::info!(bioguide_id, videos = entry.videos.len(), "Video cache refreshed");
        Ok(VideoList::from_entry(entry, false))
    }

    /// Article count and sample headlines over the last `days` days.
    ///
    /// A cached entry only counts as a hit when it covered the same window.
    ///
    /// # Errors
    /// `NotFound` for unknown people; provider and store failures.
    pub async fn news(
        &self,
        bioguide_id: &str,
        refresh: bool,
        days: Option<u32>,
    ) -> Result<NewsSummary, ServiceError> {
        let person = self.require_person(bioguide_id).await?;
        let days = days.unwrap_or(self.settings.default_news_days);

        if !refresh {
            let cached: Option<NewsCacheEntry> =
                cached_document(self.store.as_ref(), collections::NEWS_CACHE, bioguide_id)
                    .await?;
            if let Some(entry) =
                cached.filter(|e| e.days_searched == days && self.fresh(e.cached_at))
            {
                return Ok(NewsSummary::from_entry(entry, true));
            }
        }

        let now = self.clock.now();
        let from = now - TimeDelta::days(i64::from(days));
        let search_query = person.display_name();
        let (client, query) = (&self.news, search_query.as_str());
        let outcome = retry_rate_limited(
            NEWS_PROVIDER,
            self.settings.news_rate_limit_pause,
            move || client.search(query, from),
        )
        .await;
        let result = match outcome {
            Ok(result) => result,
            Err(ProviderError::NotFound) => NewsSearch::default(),
            Err(err) => {
                tracing::warn!(bioguide_id, error = %err, "News search failed");
                return Err(ServiceError::from_provider(NEWS_PROVIDER, err));
            }
        };

        let entry = NewsCacheEntry {
            bioguide_id: bioguide_id.to_string(),
            search_query,
            days_searched: days,
            total_articles: result.total_articles,
            sample_headlines: result.headlines,
            cached_at: now,
        };
        store::put_as(
            self.store.as_ref(),
            collections::NEWS_CACHE,
            bioguide_id,
            &entry,
        )
        .await?;

        let mut fields = Map::new();
        fields.insert("news_mentions".into(), Value::from(entry.total_articles));
        fields.insert(
            "news_sample_headlines".into(),
            store::encode(
                &entry
                    .sample_headlines
                    .iter()
                    .take(PERSON_HEADLINES)
                    .collect::<Vec<_>>(),
            )?,
        );
        fields.insert("news_updated_at".into(), store::encode(&now)?);
        self.store
            .merge(collections::PERSONS, bioguide_id, &fields)
            .await?;

        tracing::info!(
            bioguide_id,
            total_articles = entry.total_articles,
            days,
            "News cache refreshed"
        );
        Ok(NewsSummary::from_entry(entry, false))
    }

    /// Refresh news for up to `limit` people, never-updated first, then oldest.
    ///
    /// # Errors
    /// Returns an error when the roster cannot be read.
    pub async fn news_backlog(
        &self,
        limit: usize,
        days: u32,
        delay: Duration,
    ) -> Result<NewsRunReport, ServiceError> {
        let mut people: Vec<(Option<DateTime<Utc>>, String)> = self
            .store
            .query(collections::PERSONS, &[])
            .await?
            .into_iter()
            .filter_map(|doc| store::decode::<Person>(doc).ok())
            .map(|person| (person.news_updated_at, person.bioguide_id))
            .collect();
        // None sorts before Some, so never-updated people lead.
        people.sort();

        let mut report = NewsRunReport::default();
        for (index, (_, bioguide_id)) in people.into_iter().take(limit).enumerate() {
            if index > 0 {
                sleep(delay).await;
            }
            match self.news(&bioguide_id, true, Some(days)).await {
                Ok(_) => report.updated.push(bioguide_id),
                Err(err) => {
                    tracing::warn!(bioguide_id = %bioguide_id, error = %err, "News refresh failed");
                    report.failed.push(bioguide_id);
                }
            }
        }

        tracing::info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "News refresh run finished"
        );
        Ok(report)
    }

    fn fresh(&self, cached_at: DateTime<Utc>) -> bool {
        is_fresh(cached_at, self.clock.now(), self.settings.ttl)
    }
}
