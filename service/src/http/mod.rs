//! HTTP router and handlers.
//!
//! Every route lives under `/api`. Handlers receive their dependencies
//! through `Extension` layers installed by [`build_router`]:
//!
//! - [`legislators`] - roster queries served from the person cache
//! - [`committees`] - committee listings and memberships
//! - [`legislation`] - Congress.gov pass-through and cached summaries
//! - [`media`] - cached video and news lookups
//! - [`find_rep`] - postal-code lookup
//! - [`cache`] - cache administration

pub mod cache;
pub mod committees;
pub mod error;
pub mod find_rep;
pub mod legislation;
pub mod legislators;
pub mod media;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

use crate::{
    cache::PersonCache,
    clock::{Clock, SystemClock},
    config::Config,
    congress::HttpCongressClient,
    providers::{GNewsClient, HttpZipLookupClient, YouTubeClient},
    rest::ApiDoc,
    services::{
        LegislationService, LegislationSettings, MediaService, MediaSettings,
        RepresentativeFinder,
    },
    store::DocumentStore,
};

/// Everything the handlers need, shared across requests.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn DocumentStore>,
    pub cache: Arc<PersonCache>,
    pub legislation: Arc<LegislationService>,
    pub media: Arc<MediaService>,
    pub representatives: Arc<RepresentativeFinder>,
}

impl ApiContext {
    /// Wire the live provider clients and services around `store`.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let settings = LegislationSettings::from_config(&config.cache, &config.congress);
        let cache = Arc::new(PersonCache::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            settings.ttl,
        ));

        let legislation = LegislationService::new(
            Arc::clone(&store),
            Arc::new(HttpCongressClient::from_config(&config.congress)?),
            Arc::clone(&clock),
            settings,
        );
        let media = MediaService::new(
            Arc::clone(&store),
            Arc::new(YouTubeClient::from_config(&config.video)?),
            Arc::new(GNewsClient::from_config(&config.news)?),
            clock,
            MediaSettings::from_config(&config.cache, &config.video, &config.news),
        );
        let representatives = RepresentativeFinder::new(
            Arc::new(HttpZipLookupClient::from_config(&config.zip_lookup)?),
            Arc::clone(&cache),
        );

        if config.congress.api_key.is_empty() {
            tracing::warn!("Congress.gov API key not configured; legislation lookups will fail");
        }

        Ok(Self {
            store,
            cache,
            legislation: Arc::new(legislation),
            media: Arc::new(media),
            representatives: Arc::new(representatives),
        })
    }
}

/// Router options that come from configuration.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// `"*"` allows any origin; empty blocks cross-origin requests
    pub cors_origins: Vec<String>,
    pub swagger: bool,
}

impl RouterOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            cors_origins: config.cors.allowed_origins.clone(),
            swagger: config.swagger.enabled,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RefreshQuery {
    /// Bypass the 24h cache
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

#[allow(clippy::unused_async)] // Required for Axum handler signature
async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from the civic data API!".to_string(),
    })
}

// Health check handler
#[allow(clippy::unused_async)] // Required for Axum handler signature
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Routes mounted under `/api`.
fn api_routes() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/legislators", get(legislators::list_legislators))
        .route("/legislators/{id}", get(legislators::get_legislator))
        .route(
            "/legislators/state/{state}",
            get(legislators::legislators_by_state),
        )
        .route("/senators", get(legislators::list_senators))
        .route("/stats", get(legislators::get_stats))
        .route("/committees", get(committees::list_committees))
        .route("/committees/{id}", get(committees::get_committee))
        .route("/committees/{id}/members", get(committees::committee_members))
        .route(
            "/legislators/{id}/committees",
            get(committees::legislator_committees),
        )
        .route(
            "/legislators/{id}/sponsored-legislation",
            get(legislation::sponsored_legislation),
        )
        .route(
            "/legislators/{id}/cosponsored-legislation",
            get(legislation::cosponsored_legislation),
        )
        .route(
            "/legislators/{id}/legislation-summary",
            get(legislation::legislation_summary),
        )
        .route("/legislators/{id}/videos", get(media::legislator_videos))
        .route("/legislators/{id}/news", get(media::legislator_news))
        .route("/find-rep", get(find_rep::find_rep))
        .route("/cache/clear", post(cache::clear_cache))
        .route("/cache/status", get(cache::cache_status))
        .route(
            "/cache/refresh-legislation",
            post(cache::refresh_legislation),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin: AllowOrigin = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin - not recommended for production");
        AllowOrigin::any()
    } else if origins.is_empty() {
        tracing::info!(
            "CORS allowed origins not configured - cross-origin requests will be blocked"
        );
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        tracing::info!(origins = ?origins, "CORS allowed origins configured");
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(allow_origin)
}

/// The full application: `/api` routes, health check, docs, CORS and tracing.
pub fn build_router(context: ApiContext, options: &RouterOptions) -> Router {
    let mut app = Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health_check));

    if options.swagger {
        tracing::info!("Swagger UI enabled at /swagger-ui");
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    } else {
        app = app.route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    app.layer(Extension(context.store))
        .layer(Extension(context.cache))
        .layer(Extension(context.legislation))
        .layer(Extension(context.media))
        .layer(Extension(context.representatives))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}
