//! Refresh and lookup logic behind the provider-backed endpoints.
//!
//! - [`legislation::LegislationService`] - Congress.gov counts with a 24h cache document
//! - [`media::MediaService`] - video and news searches with 24h cache documents
//! - [`representatives::RepresentativeFinder`] - postal-code lookup matched to stored people

pub mod legislation;
pub mod media;
pub mod representatives;

use std::{future::Future, time::Duration};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::sleep;

use crate::{
    congress::CongressApiError,
    providers::ProviderError,
    store::{self, DocumentStore, StoreError},
};

pub use legislation::{LegislationService, LegislationSettings, RefreshOptions};
pub use media::{MediaService, MediaSettings, NewsRunReport};
pub use representatives::{extract_surname, RepresentativeFinder};

pub const CONGRESS_PROVIDER: &str = "Congress.gov";
pub const NEWS_PROVIDER: &str = "GNews";
pub const VIDEO_PROVIDER: &str = "YouTube";
pub const ZIP_PROVIDER: &str = "Representative lookup";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Person not found: {0}")]
    NotFound(String),

    /// Provider could not be reached (connection failure, timeout, no key)
    #[error("{provider} is unavailable: {reason}")]
    UpstreamUnavailable {
        provider: &'static str,
        reason: String,
    },

    /// Provider answered with a non-success status
    #[error("{provider} returned status {status}")]
    Upstream { provider: &'static str, status: u16 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub(crate) fn from_provider(provider: &'static str, err: ProviderError) -> Self {
        match err {
            ProviderError::Request(err) => Self::UpstreamUnavailable {
                provider,
                reason: err.to_string(),
            },
            ProviderError::NotConfigured(_) => Self::UpstreamUnavailable {
                provider,
                reason: err.to_string(),
            },
            ProviderError::NotFound => Self::Upstream {
                provider,
                status: 404,
            },
            ProviderError::RateLimited => Self::Upstream {
                provider,
                status: 429,
            },
            ProviderError::ApiError { status, .. } => Self::Upstream { provider, status },
            ProviderError::Decode(_) => Self::Upstream {
                provider,
                status: 502,
            },
        }
    }

    pub(crate) fn from_congress(err: CongressApiError) -> Self {
        let provider = CONGRESS_PROVIDER;
        match err {
            CongressApiError::Request(err) => Self::UpstreamUnavailable {
                provider,
                reason: err.to_string(),
            },
            CongressApiError::NotFound(_) => Self::Upstream {
                provider,
                status: 404,
            },
            CongressApiError::RateLimited => Self::Upstream {
                provider,
                status: 429,
            },
            CongressApiError::ApiError { status, .. } => Self::Upstream { provider, status },
            CongressApiError::Decode(_) => Self::Upstream {
                provider,
                status: 502,
            },
        }
    }
}

/// Run a provider call, retrying once after `pause` if it was rate limited.
pub(crate) async fn retry_rate_limited<T, F, Fut>(
    provider: &'static str,
    pause: Duration,
    call: F,
) -> Result<T, ProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    match call().await {
        Err(ProviderError::RateLimited) => {
            tracing::warn!(
                provider,
                pause_secs = pause.as_secs(),
                "Rate limited; pausing before retry"
            );
            sleep(pause).await;
            call().await
        }
        other => other,
    }
}

/// Read a cache document, treating an unreadable body as a miss.
pub(crate) async fn cached_document<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, ServiceError> {
    match store::get_as(store, collection, id).await {
        Ok(entry) => Ok(entry),
        Err(StoreError::Decode { id, source }) => {
            tracing::warn!(collection, id = %id, error = %source, "Ignoring unreadable cache entry");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
