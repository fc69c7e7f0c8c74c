use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use super::error::ApiError;
use crate::{
    models::FindRepResponse, rest::ProblemDetails, services::RepresentativeFinder,
    validation::validate_zip,
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct FindRepQuery {
    /// Five-digit postal code
    #[serde(default)]
    #[validate(custom(function = "validate_zip"))]
    pub zip: String,
}

/// Find the representatives for a postal code
///
/// Provider entries are matched to stored people by state and surname.
/// Unmatched entries are only present in `raw_results`.
#[utoipa::path(
    get,
    path = "/find-rep",
    tag = "Legislators",
    params(FindRepQuery),
    responses(
        (status = 200, description = "Matched people and the provider's raw entries", body = FindRepResponse),
        (status = 422, description = "Not a five-digit postal code", body = ProblemDetails),
        (status = 503, description = "Lookup provider unreachable", body = ProblemDetails)
    )
)]
pub async fn find_rep(
    Extension(finder): Extension<Arc<RepresentativeFinder>>,
    Query(query): Query<FindRepQuery>,
) -> Result<Json<FindRepResponse>, ApiError> {
    query.validate()?;
    Ok(Json(finder.find(&query.zip).await?))
}
