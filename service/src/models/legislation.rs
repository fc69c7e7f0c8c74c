//! Bills and legislation summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Latest-action marker for enacted bills, matched case-insensitively.
const PUBLIC_LAW_MARKER: &str = "became public law";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestAction {
    pub action_date: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PolicyArea {
    pub name: Option<String>,
}

/// A bill or amendment as listed by Congress.gov.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_number: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bill_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduced_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_action: Option<LatestAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_area: Option<PolicyArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Bill {
    /// Whether the latest action says the bill became public law.
    #[must_use]
    pub fn became_public_law(&self) -> bool {
        self.latest_action
            .as_ref()
            .and_then(|action| action.text.as_deref())
            .is_some_and(|text| text.to_lowercase().contains(PUBLIC_LAW_MARKER))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One page of a member's sponsored or cosponsored legislation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegislationListing {
    pub bioguide_id: String,
    pub pagination: Pagination,
    pub bills: Vec<Bill>,
}

/// Stored in `legislation_cache`, keyed by bioguide id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegislationCacheEntry {
    pub bioguide_id: String,
    pub sponsored_count: u64,
    pub cosponsored_count: u64,
    pub enacted_count: u64,
    pub recent_sponsored: Vec<Bill>,
    pub recent_enacted: Vec<Bill>,
    pub cached_at: DateTime<Utc>,
}

/// Response for the legislation-summary endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegislationSummary {
    pub bioguide_id: String,
    pub sponsored_count: u64,
    pub cosponsored_count: u64,
    pub enacted_count: u64,
    pub recent_sponsored: Vec<Bill>,
    pub recent_enacted: Vec<Bill>,
    /// When the counts were stored; absent for partial results
    pub cached_at: Option<DateTime<Utc>>,
    /// Served from the cache document without calling Congress.gov
    pub cached: bool,
    /// False when a provider call failed and the counts are partial
    pub complete: bool,
}

impl LegislationSummary {
    #[must_use]
    pub fn from_entry(entry: LegislationCacheEntry, cached: bool) -> Self {
        Self {
            bioguide_id: entry.bioguide_id,
            sponsored_count: entry.sponsored_count,
            cosponsored_count: entry.cosponsored_count,
            enacted_count: entry.enacted_count,
            recent_sponsored: entry.recent_sponsored,
            recent_enacted: entry.recent_enacted,
            cached_at: Some(entry.cached_at),
            cached,
            complete: true,
        }
    }
}

/// Outcome of a bulk stale-entry refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RefreshReport {
    /// Ids whose cache entry was rewritten
    pub refreshed: Vec<String>,
    /// Ids selected but left stale because a provider call failed
    pub failed: Vec<String>,
    /// Stale or missing entries still waiting after this run
    pub remaining: usize,
}
