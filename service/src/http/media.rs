//! Video and news endpoints.

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
    models::{NewsSummary, VideoList},
    rest::ProblemDetails,
    services::MediaService,
};

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct NewsQuery {
    /// Bypass the 24h cache
    #[serde(default)]
    pub refresh: bool,
    /// Look-back window in days (default from configuration)
    #[validate(range(min = 1, max = 365))]
    pub days: Option<u32>,
}

/// Recent videos about a person
#[utoipa::path(
    get,
    path = "/legislators/{id}/videos",
    tag = "Media",
    params(("id" = String, Path, description = "Bioguide id"), RefreshQuery),
    responses(
        (status = 200, description = "Videos, cached for 24 hours", body = VideoList),
        (status = 404, description = "Unknown person", body = ProblemDetails),
        (status = 503, description = "Video provider unreachable or not configured", body = ProblemDetails)
    )
)]
pub async fn legislator_videos(
    Extension(service): Extension<Arc<MediaService>>,
    Path(id): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<VideoList>, ApiError> {
    Ok(Json(service.videos(&id, query.refresh).await?))
}

/// Recent news mentions of a person
#[utoipa::path(
    get,
    path = "/legislators/{id}/news",
    tag = "Media",
    params(("id" = String, Path, description = "Bioguide id"), NewsQuery),
    responses(
        (status = 200, description = "Article count and sample headlines", body = NewsSummary),
        (status = 404, description = "Unknown person", body = ProblemDetails),
        (status = 422, description = "Invalid window", body = ProblemDetails),
        (status = 503, description = "News provider unreachable or not configured", body = ProblemDetails)
    )
)]
pub async fn legislator_news(
    Extension(service): Extension<Arc<MediaService>>,
    Path(id): Path<String>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsSummary>, ApiError> {
    query.validate()?;
    Ok(Json(service.news(&id, query.refresh, query.days).await?))
}
