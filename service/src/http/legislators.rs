//! Roster queries served from the person cache.

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
    models::{person::state_listing_order, Chamber, Person, PersonFilter, Stats},
    rest::ProblemDetails,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LegislatorQuery {
    /// Two-letter state code, any case
    pub state: Option<String>,
    pub party: Option<String>,
    /// `Senate`, `House` or `Governor`, any case
    pub chamber: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SenatorQuery {
    pub state: Option<String>,
    pub party: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StateQuery {
    pub chamber: Option<String>,
}

fn parse_chamber(chamber: Option<&str>) -> Result<Option<Chamber>, ApiError> {
    chamber
        .filter(|c| !c.is_empty())
        .map(|c| {
            c.parse().map_err(|err: crate::models::person::UnknownChamber| {
                ApiError::Validation {
                    field: "chamber".into(),
                    message: err.to_string(),
                }
            })
        })
        .transpose()
}

/// List legislators and governors
///
/// Filters apply to the cached roster; results keep roster order
/// (state, chamber, last name).
#[utoipa::path(
    get,
    path = "/legislators",
    tag = "Legislators",
    params(LegislatorQuery),
    responses(
        (status = 200, description = "Matching people", body = Vec<Person>),
        (status = 422, description = "Unknown chamber", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_legislators(
    Extension(cache): Extension<Arc<PersonCache>>,
    Query(query): Query<LegislatorQuery>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let chamber = parse_chamber(query.chamber.as_deref())?;
    let filter = PersonFilter::new(query.state.as_deref(), query.party.as_deref(), chamber);
    Ok(Json(cache.filtered(&filter).await?))
}

/// List senators
#[utoipa::path(
    get,
    path = "/senators",
    tag = "Legislators",
    params(SenatorQuery),
    responses(
        (status = 200, description = "Matching senators", body = Vec<Person>),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_senators(
    Extension(cache): Extension<Arc<PersonCache>>,
    Query(query): Query<SenatorQuery>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let filter = PersonFilter::new(
        query.state.as_deref(),
        query.party.as_deref(),
        Some(Chamber::Senate),
    );
    Ok(Json(cache.filtered(&filter).await?))
}

/// Get one person
#[utoipa::path(
    get,
    path = "/legislators/{id}",
    tag = "Legislators",
    params(("id" = String, Path, description = "Bioguide id, or GOV-<state> for governors")),
    responses(
        (status = 200, description = "The person", body = Person),
        (status = 404, description = "Unknown id", body = ProblemDetails)
    )
)]
pub async fn get_legislator(
    Extension(cache): Extension<Arc<PersonCache>>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = cache
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Legislator not found: {id}")))?;
    Ok(Json(Person::clone(&person)))
}

/// List one state's delegation
///
/// Senators first, then representatives, then the governor, each by last name.
#[utoipa::path(
    get,
    path = "/legislators/state/{state}",
    tag = "Legislators",
    params(
        ("state" = String, Path, description = "Two-letter state code, any case"),
        StateQuery
    ),
    responses(
        (status = 200, description = "The state's delegation", body = Vec<Person>),
        (status = 422, description = "Unknown chamber", body = ProblemDetails)
    )
)]
pub async fn legislators_by_state(
    Extension(cache): Extension<Arc<PersonCache>>,
    Path(state): Path<String>,
    Query(query): Query<StateQuery>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let chamber = parse_chamber(query.chamber.as_deref())?;
    let mut people = cache
        .filtered(&PersonFilter::new(Some(&state), None, chamber))
        .await?;
    people.sort_by(state_listing_order);
    Ok(Json(people))
}

/// Roster counts by chamber, party, gender and state
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Legislators",
    responses(
        (status = 200, description = "Roster statistics", body = Stats),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn get_stats(
    Extension(cache): Extension<Arc<PersonCache>>,
) -> Result<Json<Stats>, ApiError> {
    let roster = cache.all().await?;
    Ok(Json(Stats::from_roster(&roster)))
}
