//! Committees and per-person committee assignments.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::person::Person;

/// Full committee ids are four characters; anything longer is a subcommittee.
pub const FULL_COMMITTEE_ID_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Subcommittee {
    /// Suffix appended to the parent committee id
    pub thomas_id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Committee {
    pub thomas_id: String,
    pub name: String,
    /// `house`, `senate` or `joint`
    #[serde(rename = "type")]
    pub committee_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub rss_url: String,
    #[serde(default)]
    pub minority_url: String,
    #[serde(default)]
    pub subcommittees: Vec<Subcommittee>,
}

/// One seat on a committee or subcommittee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommitteeAssignment {
    pub committee_id: String,
    pub committee_name: String,
    pub is_subcommittee: bool,
    pub parent_committee_id: Option<String>,
    pub parent_committee_name: Option<String>,
    pub rank: Option<u32>,
    /// Chair, Ranking Member, ...
    pub title: Option<String>,
    /// `majority` or `minority`
    pub party: Option<String>,
}

impl CommitteeAssignment {
    /// Full committees first, titled seats before untitled, then rank (missing last).
    #[must_use]
    pub fn seat_order(a: &Self, b: &Self) -> Ordering {
        a.is_subcommittee
            .cmp(&b.is_subcommittee)
            .then_with(|| b.title.is_some().cmp(&a.title.is_some()))
            .then_with(|| rank_key(a.rank).cmp(&rank_key(b.rank)))
    }
}

/// Missing ranks sort after every real rank.
#[must_use]
pub fn rank_key(rank: Option<u32>) -> u32 {
    rank.unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommitteeMembership {
    pub bioguide_id: String,
    pub committees: Vec<CommitteeAssignment>,
}

/// A committee seat together with the member's document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommitteeMember {
    pub bioguide_id: String,
    pub legislator: Person,
    pub rank: Option<u32>,
    pub title: Option<String>,
    pub party: Option<String>,
}

/// A person's seats split by committee level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonCommittees {
    pub bioguide_id: String,
    pub committees: Vec<CommitteeAssignment>,
    pub subcommittees: Vec<CommitteeAssignment>,
}

impl PersonCommittees {
    #[must_use]
    pub fn empty(bioguide_id: impl Into<String>) -> Self {
        Self {
            bioguide_id: bioguide_id.into(),
            committees: Vec::new(),
            subcommittees: Vec::new(),
        }
    }

    #[must_use]
    pub fn split(membership: CommitteeMembership) -> Self {
        let (subcommittees, committees) = membership
            .committees
            .into_iter()
            .partition(|assignment| assignment.is_subcommittee);
        Self {
            bioguide_id: membership.bioguide_id,
            committees,
            subcommittees,
        }
    }
}
