//! Handler errors and their problem responses.

use axum::response::{IntoResponse, Response};
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    rest::ProblemDetails, services::ServiceError, store::StoreError, validation::first_error,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{provider} is unavailable: {reason}")]
    UpstreamUnavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} returned status {status}")]
    Upstream { provider: &'static str, status: u16 },

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(id) => Self::NotFound(format!("Legislator not found: {id}")),
            ServiceError::UpstreamUnavailable { provider, reason } => {
                Self::UpstreamUnavailable { provider, reason }
            }
            ServiceError::Upstream { provider, status } => Self::Upstream { provider, status },
            ServiceError::Store(err) => Self::Store(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let (field, message) = first_error(&errors);
        Self::Validation { field, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = match &self {
            Self::NotFound(detail) => ProblemDetails::not_found(detail),
            Self::UpstreamUnavailable { provider, reason } => {
                tracing::warn!(provider, reason = %reason, "Upstream unavailable");
                ProblemDetails::upstream_unavailable(provider)
            }
            Self::Upstream { provider, status } => {
                tracing::warn!(provider, status, "Upstream error");
                ProblemDetails::upstream(provider, *status)
            }
            Self::Validation { field, message } => ProblemDetails::validation(field, message),
            Self::Store(err) => {
                tracing::error!(error = %err, "Store error");
                ProblemDetails::internal_error("Internal server error")
            }
        };
        problem.into_response()
    }
}
