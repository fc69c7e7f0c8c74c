//! Congress.gov legislation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use super::{error::ApiError, RefreshQuery};
use crate::{
    congress::LegislationKind,
    models::{LegislationListing, LegislationSummary},
    rest::ProblemDetails,
    services::LegislationService,
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ListingQuery {
    /// Bills per page (1-250)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 250))]
    #[param(default = 20, maximum = 250)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u32 {
    20
}

async fn listing(
    service: &LegislationService,
    kind: LegislationKind,
    id: &str,
    query: &ListingQuery,
) -> Result<Json<LegislationListing>, ApiError> {
    query.validate()?;
    Ok(Json(
        service.listing(id, kind, query.limit, query.offset).await?,
    ))
}

/// One page of a member's sponsored legislation
#[utoipa::path(
    get,
    path = "/legislators/{id}/sponsored-legislation",
    tag = "Legislation",
    params(("id" = String, Path, description = "Bioguide id"), ListingQuery),
    responses(
        (status = 200, description = "Provider page passed through", body = LegislationListing),
        (status = 404, description = "Unknown person", body = ProblemDetails),
        (status = 422, description = "Invalid paging", body = ProblemDetails),
        (status = 503, description = "Congress.gov unreachable", body = ProblemDetails)
    )
)]
pub async fn sponsored_legislation(
    Extension(service): Extension<Arc<LegislationService>>,
    Path(id): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<LegislationListing>, ApiError> {
    listing(&service, LegislationKind::Sponsored, &id, &query).await
}

/// One page of a member's cosponsored legislation
#[utoipa::path(
    get,
    path = "/legislators/{id}/cosponsored-legislation",
    tag = "Legislation",
    params(("id" = String, Path, description = "Bioguide id"), ListingQuery),
    responses(
        (status = 200, description = "Provider page passed through", body = LegislationListing),
        (status = 404, description = "Unknown person", body = ProblemDetails),
        (status = 422, description = "Invalid paging", body = ProblemDetails),
        (status = 503, description = "Congress.gov unreachable", body = ProblemDetails)
    )
)]
pub async fn cosponsored_legislation(
    Extension(service): Extension<Arc<LegislationService>>,
    Path(id): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<LegislationListing>, ApiError> {
    listing(&service, LegislationKind::Cosponsored, &id, &query).await
}

/// Legislation counts, cached for 24 hours
///
/// Provider failures do not fail the request: the partial counts are
/// returned with `complete = false` and are not cached.
#[utoipa::path(
    get,
    path = "/legislators/{id}/legislation-summary",
    tag = "Legislation",
    params(("id" = String, Path, description = "Bioguide id"), RefreshQuery),
    responses(
        (status = 200, description = "Counts and recent bills", body = LegislationSummary),
        (status = 404, description = "Unknown person", body = ProblemDetails)
    )
)]
pub async fn legislation_summary(
    Extension(service): Extension<Arc<LegislationService>>,
    Path(id): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<LegislationSummary>, ApiError> {
    Ok(Json(service.summary(&id, query.refresh).await?))
}
