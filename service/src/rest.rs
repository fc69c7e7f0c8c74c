//! Problem responses and `OpenAPI` documentation for the REST API.
//!
//! Handlers live in [`crate::http`]; this module collects their paths and
//! the shared schemas into [`ApiDoc`].

// The OpenApi derive macro generates code that triggers this lint
#![allow(clippy::needless_for_each)]

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Serialize, Serializer};
use utoipa::{OpenApi, ToSchema};

use crate::{
    cache::CacheStatus,
    http::{cache, committees, find_rep, legislation, legislators, media},
    models::{
        Bill, Chamber, Committee, CommitteeAssignment, CommitteeMember, ExternalIds,
        FindRepResponse, Headline, LatestAction, LegislationListing, LegislationSummary,
        NewsSummary, Pagination, Person, PersonCommittees, PolicyArea, RefreshReport, Stats,
        Subcommittee, Video, VideoList, ZipLookupResult,
    },
};

/// Serialize a `StatusCode` as its `u16` representation.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires `&T` signature
fn serialize_status_code<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

/// RFC 7807 Problem Details error response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short human-readable summary
    pub title: String,
    /// HTTP status code
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// Human-readable explanation specific to this occurrence
    pub detail: String,
    /// URI reference identifying the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ProblemExtensions>,
}

/// Machine-readable error code and, for validation errors, the offending field.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemExtensions {
    pub code: String,
    /// Field that caused the error (for validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ProblemDetails {
    fn new(kind: &str, title: &str, status: StatusCode, detail: String, code: &str) -> Self {
        Self {
            problem_type: format!("/errors/{kind}"),
            title: title.to_string(),
            status,
            detail,
            instance: None,
            extensions: Some(ProblemExtensions {
                code: code.to_string(),
                field: None,
            }),
        }
    }

    #[must_use]
    pub fn not_found(detail: &str) -> Self {
        Self::new(
            "not-found",
            "Not Found",
            StatusCode::NOT_FOUND,
            detail.to_string(),
            "NOT_FOUND",
        )
    }

    /// Request parameter failed validation.
    #[must_use]
    pub fn validation(field: &str, detail: &str) -> Self {
        let mut problem = Self::new(
            "validation",
            "Validation Error",
            StatusCode::UNPROCESSABLE_ENTITY,
            detail.to_string(),
            "VALIDATION_ERROR",
        );
        if let Some(ext) = problem.extensions.as_mut() {
            ext.field = Some(field.to_string());
        }
        problem
    }

    /// A provider could not be reached at all.
    #[must_use]
    pub fn upstream_unavailable(provider: &str) -> Self {
        Self::new(
            "upstream-unavailable",
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{provider} is unavailable"),
            "UPSTREAM_UNAVAILABLE",
        )
    }

    /// A provider answered with an error status, passed through unchanged.
    #[must_use]
    pub fn upstream(provider: &str, status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        Self::new(
            "upstream",
            status.canonical_reason().unwrap_or("Upstream Error"),
            status,
            format!("{provider} API error"),
            "UPSTREAM_ERROR",
        )
    }

    /// Create an internal server error response.
    #[must_use]
    pub fn internal_error(detail: &str) -> Self {
        Self::new(
            "internal",
            "Internal Server Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            detail.to_string(),
            "INTERNAL_ERROR",
        )
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// `OpenAPI` documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Civic Data API",
        version = "1.0.0",
        description = "Legislators, governors and committees, with cached Congress.gov, news and video lookups",
        license(name = "MIT")
    ),
    servers(
        (url = "/api", description = "REST API")
    ),
    paths(
        legislators::list_legislators,
        legislators::list_senators,
        legislators::get_legislator,
        legislators::legislators_by_state,
        legislators::get_stats,
        committees::list_committees,
        committees::get_committee,
        committees::committee_members,
        committees::legislator_committees,
        legislation::sponsored_legislation,
        legislation::cosponsored_legislation,
        legislation::legislation_summary,
        media::legislator_videos,
        media::legislator_news,
        find_rep::find_rep,
        cache::clear_cache,
        cache::cache_status,
        cache::refresh_legislation,
    ),
    components(schemas(
        Person,
        Chamber,
        ExternalIds,
        Stats,
        Committee,
        Subcommittee,
        CommitteeAssignment,
        CommitteeMember,
        PersonCommittees,
        Bill,
        LatestAction,
        PolicyArea,
        Pagination,
        LegislationListing,
        LegislationSummary,
        RefreshReport,
        Video,
        VideoList,
        Headline,
        NewsSummary,
        ZipLookupResult,
        FindRepResponse,
        CacheStatus,
        cache::ClearResponse,
        ProblemDetails,
        ProblemExtensions
    ))
)]
pub struct ApiDoc;
