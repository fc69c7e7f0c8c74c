//! Committee listings and memberships, read straight from the store.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::error::ApiError;
use crate::{
    cache::PersonCache,
    models::{
        committee::rank_key, Committee, CommitteeMember, CommitteeMembership, PersonCommittees,
    },
    rest::ProblemDetails,
    store::{self, collections, DocumentStore, FieldFilter},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CommitteeQuery {
    /// `house`, `senate` or `joint`, any case
    #[serde(rename = "type", alias = "committee_type")]
    pub committee_type: Option<String>,
}

/// List committees
#[utoipa::path(
    get,
    path = "/committees",
    tag = "Committees",
    params(CommitteeQuery),
    responses(
        (status = 200, description = "Committees sorted by name", body = Vec<Committee>),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_committees(
    Extension(store): Extension<Arc<dyn DocumentStore>>,
    Query(query): Query<CommitteeQuery>,
) -> Result<Json<Vec<Committee>>, ApiError> {
    let filters: Vec<FieldFilter> = query
        .committee_type
        .filter(|t| !t.is_empty())
        .map(|t| FieldFilter::equals("type", t.to_lowercase()))
        .into_iter()
        .collect();

    let mut committees = Vec::new();
    for doc in store.query(collections::COMMITTEES, &filters).await? {
        committees.push(store::decode::<Committee>(doc)?);
    }
    committees.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(committees))
}

/// Get one committee
#[utoipa::path(
    get,
    path = "/committees/{id}",
    tag = "Committees",
    params(("id" = String, Path, description = "Committee thomas id")),
    responses(
        (status = 200, description = "The committee", body = Committee),
        (status = 404, description = "Unknown committee", body = ProblemDetails)
    )
)]
pub async fn get_committee(
    Extension(store): Extension<Arc<dyn DocumentStore>>,
    Path(id): Path<String>,
) -> Result<Json<Committee>, ApiError> {
    store::get_as::<Committee>(store.as_ref(), collections::COMMITTEES, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Committee not found: {id}")))
}

/// List a committee's members
///
/// Sorted by rank, members without one last. An unknown committee has no members.
#[utoipa::path(
    get,
    path = "/committees/{id}/members",
    tag = "Committees",
    params(("id" = String, Path, description = "Committee or subcommittee id")),
    responses(
        (status = 200, description = "Members with their seat details", body = Vec<CommitteeMember>),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn committee_members(
    Extension(store): Extension<Arc<dyn DocumentStore>>,
    Extension(cache): Extension<Arc<PersonCache>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommitteeMember>>, ApiError> {
    let mut members = Vec::new();
    for doc in store.query(collections::MEMBERSHIPS, &[]).await? {
        let membership: CommitteeMembership = store::decode(doc)?;
        let Some(seat) = membership
            .committees
            .into_iter()
            .find(|seat| seat.committee_id == id)
        else {
            continue;
        };
        // Seats of people no longer in the roster are dropped.
        let Some(person) = cache.get(&membership.bioguide_id).await? else {
            continue;
        };
        members.push(CommitteeMember {
            bioguide_id: membership.bioguide_id,
            legislator: (*person).clone(),
            rank: seat.rank,
            title: seat.title,
            party: seat.party,
        });
    }
    members.sort_by_key(|member| rank_key(member.rank));
    Ok(Json(members))
}

/// A person's committees and subcommittees
#[utoipa::path(
    get,
    path = "/legislators/{id}/committees",
    tag = "Committees",
    params(("id" = String, Path, description = "Bioguide id")),
    responses(
        (status = 200, description = "Seats split by level", body = PersonCommittees),
        (status = 404, description = "Unknown person", body = ProblemDetails)
    )
)]
pub async fn legislator_committees(
    Extension(store): Extension<Arc<dyn DocumentStore>>,
    Extension(cache): Extension<Arc<PersonCache>>,
    Path(id): Path<String>,
) -> Result<Json<PersonCommittees>, ApiError> {
    if cache.get(&id).await?.is_none() {
        return Err(ApiError::not_found(format!("Legislator not found: {id}")));
    }

    let membership =
        store::get_as::<CommitteeMembership>(store.as_ref(), collections::MEMBERSHIPS, &id).await?;
    Ok(Json(membership.map_or_else(
        || PersonCommittees::empty(&id),
        PersonCommittees::split,
    )))
}
