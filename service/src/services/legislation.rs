//! Congress.gov legislation counts for one person, cached per person for 24h.
//!
//! A refresh walks every page of the member's sponsored legislation,
//! counting bills whose latest action says they became public law, then
//! reads the cosponsored total with a single `limit=1` call. The two lists
//! are fetched independently: a failure in one leaves its counts at whatever
//! was gathered and marks the summary incomplete instead of failing the
//! request. Incomplete summaries are returned but never cached.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Map, Value};
use tokio::time::sleep;

use super::{cached_document, ServiceError};
use crate::{
    cache::is_fresh,
    clock::Clock,
    config::{CacheConfig, CongressConfig},
    congress::{Bill, CongressApiClient, CongressApiError, LegislationKind, LegislationPage},
    models::{
        LegislationCacheEntry, LegislationListing, LegislationSummary, Person, RefreshReport,
    },
    store::{self, collections, DocumentStore},
};

/// Sample bills kept per category.
pub const SAMPLE_SIZE: usize = 5;

/// Largest page Congress.gov serves.
pub const MAX_PAGE_SIZE: u32 = 250;

#[derive(Debug, Clone)]
pub struct LegislationSettings {
    pub ttl: TimeDelta,
    pub page_size: u32,
    /// Pause between consecutive provider calls
    pub request_delay: Duration,
    /// Pause before the single retry after a 429
    pub rate_limit_pause: Duration,
}

impl LegislationSettings {
    #[must_use]
    pub fn from_config(cache: &CacheConfig, congress: &CongressConfig) -> Self {
        Self {
            ttl: TimeDelta::hours(i64::from(cache.ttl_hours)),
            page_size: congress.page_size.clamp(1, MAX_PAGE_SIZE),
            request_delay: Duration::from_millis(congress.request_delay_ms),
            rate_limit_pause: Duration::from_secs(congress.rate_limit_pause_secs),
        }
    }
}

impl Default for LegislationSettings {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default(), &CongressConfig::default())
    }
}

/// Which people a bulk refresh touches.
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    /// Refresh fresh entries too
    pub force: bool,
    /// Process at most this many people
    pub limit: Option<usize>,
    /// Pause between people; defaults to the configured request delay
    pub delay: Option<Duration>,
}

/// Running totals over the sponsored-legislation pages.
#[derive(Debug, Default)]
struct SponsoredTally {
    count: u64,
    enacted: u64,
    recent: Vec<Bill>,
    recent_enacted: Vec<Bill>,
    complete: bool,
}

impl SponsoredTally {
    fn absorb(&mut self, bills: Vec<Bill>) {
        for bill in bills {
            let enacted = bill.became_public_law();
            if enacted {
                self.enacted += 1;
                if self.recent_enacted.len() < SAMPLE_SIZE {
                    self.recent_enacted.push(bill.clone());
                }
            }
            if self.recent.len() < SAMPLE_SIZE {
                self.recent.push(bill);
            }
        }
    }
}

pub struct LegislationService {
    store: Arc<dyn DocumentStore>,
    congress: Arc<dyn CongressApiClient>,
    clock: Arc<dyn Clock>,
    settings: LegislationSettings,
}

impl LegislationService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        congress: Arc<dyn CongressApiClient>,
        clock: Arc<dyn Clock>,
        settings: LegislationSettings,
    ) -> Self {
        Self {
            store,
            congress,
            clock,
            settings,
        }
    }

    async fn require_person(&self, bioguide_id: &str) -> Result<Person, ServiceError> {
        store::get_as::<Person>(self.store.as_ref(), collections::PERSONS, bioguide_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(bioguide_id.to_string()))
    }

    /// One page of a member's sponsored or cosponsored legislation, passed through.
    ///
    /// A provider 404 is an empty listing.
    ///
    /// # Errors
    /// `NotFound` for unknown people; upstream errors otherwise.
    pub async fn listing(
        &self,
        bioguide_id: &str,
        kind: LegislationKind,
        limit: u32,
        offset: u64,
    ) -> Result<LegislationListing, ServiceError> {
        self.require_person(bioguide_id).await?;

        let page = match self
            .congress
            .list_legislation(kind, bioguide_id, limit, offset)
            .await
        {
            Ok(page) => page,
            Err(CongressApiError::NotFound(_)) => LegislationPage::empty(),
            Err(err) => return Err(ServiceError::from_congress(err)),
        };

        Ok(LegislationListing {
            bioguide_id: bioguide_id.to_string(),
            pagination: page.pagination,
            bills: page.bills,
        })
    }

    /// Legislation counts for one person.
    ///
    /// Served from the cache document when it is younger than the TTL and
    /// `refresh` is false.
    ///
    /// # Errors
    /// `NotFound` for unknown people; store failures. Provider failures
    /// degrade to a partial summary instead.
    pub async fn summary(
        &self,
        bioguide_id: &str,
        refresh: bool,
    ) -> Result<LegislationSummary, ServiceError> {
        self.require_person(bioguide_id).await?;

        if !refresh {
            let cached: Option<LegislationCacheEntry> = cached_document(
                self.store.as_ref(),
                collections::LEGISLATION_CACHE,
                bioguide_id,
            )
            .await?;
            if let Some(entry) = cached {
                if is_fresh(entry.cached_at, self.clock.now(), self.settings.ttl) {
                    return Ok(LegislationSummary::from_entry(entry, true));
                }
            }
        }

        let sponsored = self.tally_sponsored(bioguide_id).await;
        sleep(self.settings.request_delay).await;
        let cosponsored = self.count_cosponsored(bioguide_id).await;

        let complete = sponsored.complete && cosponsored.is_some();
        let cosponsored_count = cosponsored.unwrap_or(0);

        if !complete {
            tracing::warn!(
                bioguide_id,
                sponsored_complete = sponsored.complete,
                "Legislation refresh incomplete; not caching"
            );
            return Ok(LegislationSummary {
                bioguide_id: bioguide_id.to_string(),
                sponsored_count: sponsored.count,
                cosponsored_count,
                enacted_count: sponsored.enacted,
                recent_sponsored: sponsored.recent,
                recent_enacted: sponsored.recent_enacted,
                cached_at: None,
                cached: false,
                complete: false,
            });
        }

        let entry = LegislationCacheEntry {
            bioguide_id: bioguide_id.to_string(),
            sponsored_count: sponsored.count,
            cosponsored_count,
            enacted_count: sponsored.enacted,
            recent_sponsored: sponsored.recent,
            recent_enacted: sponsored.recent_enacted,
            cached_at: self.clock.now(),
        };
        self.save(&entry).await?;

        tracing::info!(
            bioguide_id,
            sponsored = entry.sponsored_count,
            cosponsored = entry.cosponsored_count,
            enacted = entry.enacted_count,
            "Legislation summary refreshed"
        );
        Ok(LegislationSummary::from_entry(entry, false))
    }

    /// Refresh up to `limit` congressional people whose cache entry is missing or stale.
    ///
    /// # Errors
    /// Returns an error when the store cannot be scanned.
    pub async fn refresh_stale(&self, limit: usize) -> Result<RefreshReport, ServiceError> {
        self.refresh_many(&RefreshOptions {
            force: false,
            limit: Some(limit),
            delay: None,
        })
        .await
    }

    /// Sequentially refresh congressional people in identifier order.
    ///
    /// Without `force` only missing or stale entries are selected.
    ///
    /// # Errors
    /// Returns an error when the store cannot be scanned.
    pub async fn refresh_many(
        &self,
        options: &RefreshOptions,
    ) -> Result<RefreshReport, ServiceError> {
        let candidates = self.candidates(options.force).await?;
        let limit = options.limit.unwrap_or(candidates.len());
        let delay = options.delay.unwrap_or(self.settings.request_delay);

        let mut report = RefreshReport::default();
        for (index, bioguide_id) in candidates.iter().take(limit).enumerate() {
            if index > 0 {
                sleep(delay).await;
            }
            match self.summary(bioguide_id, true).await {
                Ok(summary) if summary.complete => report.refreshed.push(bioguide_id.clone()),
                Ok(_) => report.failed.push(bioguide_id.clone()),
                Err(err) => {
                    tracing::warn!(
                        bioguide_id = %bioguide_id,
                        error = %err,
                        "Legislation refresh failed"
                    );
                    report.failed.push(bioguide_id.clone());
                }
            }
        }
        report.remaining = candidates.len() - report.refreshed.len();

        tracing::info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            remaining = report.remaining,
            "Legislation refresh run finished"
        );
        Ok(report)
    }

    /// Congressional ids in ascending order, optionally only those needing a refresh.
    async fn candidates(&self, include_fresh: bool) -> Result<Vec<String>, ServiceError> {
        let people = self.store.query(collections::PERSONS, &[]).await?;
        let cached_at: HashMap<String, DateTime<Utc>> = if include_fresh {
            HashMap::new()
        } else {
            self.store
                .query(collections::LEGISLATION_CACHE, &[])
                .await?
                .into_iter()
                .filter_map(|doc| {
                    store::decode::<LegislationCacheEntry>(doc)
                        .ok()
                        .map(|entry| (entry.bioguide_id, entry.cached_at))
                })
                .collect()
        };

        let now = self.clock.now();
        let mut ids: Vec<String> = people
            .into_iter()
            .filter_map(|doc| store::decode::<Person>(doc).ok())
            .filter(Person::is_congressional)
            .map(|person| person.bioguide_id)
            .filter(|id| {
                include_fresh
                    || cached_at
                        .get(id)
                        .is_none_or(|at| !is_fresh(*at, now, self.settings.ttl))
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Overwrite the cache document and copy the counts onto the person.
    async fn save(&self, entry: &LegislationCacheEntry) -> Result<(), ServiceError> {
        store::put_as(
            self.store.as_ref(),
            collections::LEGISLATION_CACHE,
            &entry.bioguide_id,
            entry,
        )
        .await?;

        let mut fields = Map::new();
        fields.insert("sponsored_count".into(), Value::from(entry.sponsored_count));
        fields.insert(
            "cosponsored_count".into(),
            Value::from(entry.cosponsored_count),
        );
        fields.insert("enacted_count".into(), Value::from(entry.enacted_count));
        fields.insert(
            "legislation_updated_at".into(),
            store::encode(&entry.cached_at)?,
        );
        self.store
            .merge(collections::PERSONS, &entry.bioguide_id, &fields)
            .await?;
        Ok(())
    }

    /// One provider call, retried once after a pause if rate limited.
    async fn call(
        &self,
        kind: LegislationKind,
        bioguide_id: &str,
        limit: u32,
        offset: u64,
    ) -> Result<LegislationPage, CongressApiError> {
        match self
            .congress
            .list_legislation(kind, bioguide_id, limit, offset)
            .await
        {
            Err(CongressApiError::RateLimited) => {
                tracing::warn!(
                    bioguide_id,
                    pause_secs = self.settings.rate_limit_pause.as_secs(),
                    "Rate limited by Congress.gov; pausing before retry"
                );
                sleep(self.settings.rate_limit_pause).await;
                self.congress
                    .list_legislation(kind, bioguide_id, limit, offset)
                    .await
            }
            other => other,
        }
    }

    async fn tally_sponsored(&self, bioguide_id: &str) -> SponsoredTally {
        let page_size = self.settings.page_size;
        let mut tally = SponsoredTally::default();
        let mut offset = 0_u64;

        loop {
            let page = match self
                .call(LegislationKind::Sponsored, bioguide_id, page_size, offset)
                .await
            {
                Ok(page) => page,
                Err(CongressApiError::NotFound(_)) => break,
                Err(err) => {
                    tracing::warn!(
                        bioguide_id,
                        offset,
                        error = %err,
                        "Sponsored legislation fetch failed"
                    );
                    return tally;
                }
            };

            tally.count = page.pagination.count;
            tally.absorb(page.bills);
            offset += u64::from(page_size);
            if offset >= tally.count {
                break;
            }
            sleep(self.settings.request_delay).await;
        }

        tally.complete = true;
        tally
    }

    /// Total cosponsored count, `None` if the call failed.
    async fn count_cosponsored(&self, bioguide_id: &str) -> Option<u64> {
        match self
            .call(LegislationKind::Cosponsored, bioguide_id, 1, 0)
            .await
        {
            Ok(page) => Some(page.pagination.count),
            Err(CongressApiError::NotFound(_)) => Some(0),
            Err(err) => {
                tracing::warn!(bioguide_id, error = %err, "Cosponsored legislation fetch failed");
                None
            }
        }
    }
}
