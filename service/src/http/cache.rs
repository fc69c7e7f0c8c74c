//! Cache administration.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::error::ApiError;
use crate::{
    cache::{CacheStatus, PersonCache},
    models::RefreshReport,
    rest::ProblemDetails,
    services::LegislationService,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct RefreshLegislationQuery {
    /// People to refresh in this call (1-50)
    #[serde(default = "default_refresh_limit")]
    #[validate(range(min = 1, max = 50))]
    #[param(default = 10, minimum = 1, maximum = 50)]
    pub limit: usize,
}

const fn default_refresh_limit() -> usize {
    10
}

/// Drop every cached roster and person slot
#[utoipa::path(
    post,
    path = "/cache/clear",
    tag = "Cache",
    responses((status = 200, description = "Cache cleared", body = ClearResponse))
)]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn clear_cache(Extension(cache): Extension<Arc<PersonCache>>) -> Json<ClearResponse> {
    cache.clear();
    Json(ClearResponse {
        message: "Cache cleared".to_string(),
    })
}

/// Current cache occupancy
#[utoipa::path(
    get,
    path = "/cache/status",
    tag = "Cache",
    responses((status = 200, description = "Cache status", body = CacheStatus))
)]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn cache_status(Extension(cache): Extension<Arc<PersonCache>>) -> Json<CacheStatus> {
    Json(cache.status())
}

/// Refresh stale legislation summaries
///
/// Picks up to `limit` members of Congress whose summary is missing or older
/// than 24 hours, in id order, and refreshes them one after another.
#[utoipa::path(
    post,
    path = "/cache/refresh-legislation",
    tag = "Cache",
    params(RefreshLegislationQuery),
    responses(
        (status = 200, description = "Refreshed ids and how many remain stale", body = RefreshReport),
        (status = 422, description = "Limit out of range", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn refresh_legislation(
    Extension(service): Extension<Arc<LegislationService>>,
    Query(query): Query<RefreshLegislationQuery>,
) -> Result<Json<RefreshReport>, ApiError> {
    query.validate()?;
    Ok(Json(service.refresh_stale(query.limit).await?))
}
