use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with `CIVIC_` prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub swagger: SwaggerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub congress: CongressConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub zip_lookup: ZipLookupConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database host.
    #[serde(default = "default_db_host")]
    pub host: String,

    /// Database port.
    #[serde(default = "default_db_port")]
    pub port: u16,

    /// Database name.
    #[serde(default = "default_db_name")]
    pub name: String,

    /// Database user (required, no compiled-in default).
    #[serde(default)]
    pub user: String,

    /// Database password (required, no compiled-in default).
    #[serde(default)]
    pub password: String,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Optional custom migrations directory path.
    pub migrations_dir: Option<String>,
}

impl DatabaseConfig {
    /// Assemble a `PostgreSQL` connection URL from individual fields.
    #[must_use]
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests.
    /// Use `"*"` to allow any origin.
    /// Accepts either an array or comma-separated string.
    /// Example: `["http://localhost:5173"]` or `"http://localhost:5173,https://app.example.com"`
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

/// Deserialize origins from comma-separated string or array, filtering empty values.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(origins.into_iter().filter(|s| !s.is_empty()).collect())
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwaggerConfig {
    /// Enable Swagger UI at /swagger-ui.
    /// Enable in development via `CIVIC_SWAGGER__ENABLED=true`
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Lifetime of the in-process roster cache and of every cache document.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CongressConfig {
    #[serde(default = "default_congress_base_url")]
    pub base_url: String,

    /// Congress.gov API key. Set via `CIVIC_CONGRESS__API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_congress_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size used when walking a member's sponsored bills (max 250).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Pause between consecutive Congress.gov calls in bulk runs.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Pause before the single retry after a 429.
    #[serde(default = "default_rate_limit_pause_secs")]
    pub rate_limit_pause_secs: u64,
}

impl Default for CongressConfig {
    fn default() -> Self {
        Self {
            base_url: default_congress_base_url(),
            api_key: String::new(),
            timeout_secs: default_congress_timeout_secs(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
            rate_limit_pause_secs: default_rate_limit_pause_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// GNews API key. Set via `CIVIC_NEWS__API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Look-back window when a request does not specify one.
    #[serde(default = "default_news_days")]
    pub default_days: u32,

    /// Articles requested per search.
    #[serde(default = "default_news_max_results")]
    pub max_results: u32,

    #[serde(default = "default_news_lang")]
    pub lang: String,

    #[serde(default = "default_news_country")]
    pub country: String,

    /// Pause before the single retry after a 429.
    #[serde(default = "default_rate_limit_pause_secs")]
    pub rate_limit_pause_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
            api_key: String::new(),
            timeout_secs: default_provider_timeout_secs(),
            default_days: default_news_days(),
            max_results: default_news_max_results(),
            lang: default_news_lang(),
            country: default_news_country(),
            rate_limit_pause_secs: default_rate_limit_pause_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoConfig {
    #[serde(default = "default_video_base_url")]
    pub base_url: String,

    /// YouTube Data API key. Set via `CIVIC_VIDEO__API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Videos kept per person.
    #[serde(default = "default_video_max_results")]
    pub max_results: u32,

    /// Pause before the single retry after a 429.
    #[serde(default = "default_rate_limit_pause_secs")]
    pub rate_limit_pause_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            base_url: default_video_base_url(),
            api_key: String::new(),
            timeout_secs: default_provider_timeout_secs(),
            max_results: default_video_max_results(),
            rate_limit_pause_secs: default_rate_limit_pause_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZipLookupConfig {
    #[serde(default = "default_zip_base_url")]
    pub base_url: String,

    #[serde(default = "default_zip_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ZipLookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_zip_base_url(),
            timeout_secs: default_zip_timeout_secs(),
        }
    }
}

/// Where the importers read their datasets from. Each entry is a URL or a
/// local file path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetsConfig {
    #[serde(default = "default_legislators_source")]
    pub legislators: String,

    #[serde(default = "default_governors_source")]
    pub governors: String,

    #[serde(default = "default_committees_source")]
    pub committees: String,

    #[serde(default = "default_membership_source")]
    pub committee_membership: String,

    /// Base URL of the GovTrack per-Congress analysis files.
    #[serde(default = "default_govtrack_base")]
    pub govtrack_base: String,

    #[serde(default = "default_dataset_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            legislators: default_legislators_source(),
            governors: default_governors_source(),
            committees: default_committees_source(),
            committee_membership: default_membership_source(),
            govtrack_base: default_govtrack_base(),
            timeout_secs: default_dataset_timeout_secs(),
        }
    }
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_max_connections() -> u32 {
    10
}

#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "civicdata".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origins() -> Vec<String> {
    // Empty means no cross-origin requests.
    // Configure explicitly via CIVIC_CORS__ALLOWED_ORIGINS or config.yaml
    vec![]
}

#[allow(clippy::missing_const_for_fn)]
fn default_ttl_hours() -> u32 {
    24
}

fn default_congress_base_url() -> String {
    "https://api.congress.gov/v3".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_congress_timeout_secs() -> u64 {
    30
}

#[allow(clippy::missing_const_for_fn)]
fn default_page_size() -> u32 {
    250
}

#[allow(clippy::missing_const_for_fn)]
fn default_request_delay_ms() -> u64 {
    500
}

#[allow(clippy::missing_const_for_fn)]
fn default_rate_limit_pause_secs() -> u64 {
    60
}

fn default_news_base_url() -> String {
    "https://gnews.io/api/v4".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_provider_timeout_secs() -> u64 {
    15
}

#[allow(clippy::missing_const_for_fn)]
fn default_news_days() -> u32 {
    30
}

#[allow(clippy::missing_const_for_fn)]
fn default_news_max_results() -> u32 {
    10
}

fn default_news_lang() -> String {
    "en".to_string()
}

fn default_news_country() -> String {
    "us".to_string()
}

fn default_video_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_video_max_results() -> u32 {
    6
}

fn default_zip_base_url() -> String {
    "https://whoismyrepresentative.com".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_zip_timeout_secs() -> u64 {
    10
}

fn default_legislators_source() -> String {
    "https://unitedstates.github.io/congress-legislators/legislators-current.json".to_string()
}

fn default_governors_source() -> String {
    "governors-current.json".to_string()
}

fn default_committees_source() -> String {
    "https://unitedstates.github.io/congress-legislators/committees-current.json".to_string()
}

fn default_membership_source() -> String {
    "https://unitedstates.github.io/congress-legislators/committee-membership-current.json"
        .to_string()
}

fn default_govtrack_base() -> String {
    "https://www.govtrack.us/data/analysis/by-congress".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_dataset_timeout_secs() -> u64 {
    30
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: default_db_host(),
                port: default_db_port(),
                name: default_db_name(),
                user: String::new(),
                password: String::new(),
                max_connections: default_max_connections(),
                migrations_dir: None,
            },
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            cors: CorsConfig::default(),
            swagger: SwaggerConfig::default(),
            cache: CacheConfig::default(),
            congress: CongressConfig::default(),
            news: NewsConfig::default(),
            video: VideoConfig::default(),
            zip_lookup: ZipLookupConfig::default(),
            datasets: DatasetsConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with `CIVIC_` prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("CIVIC_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.user.is_empty() {
            return Err(ConfigError::Validation(
                "database.user is required. Set CIVIC_DATABASE__USER environment variable or configure in config.yaml.".into(),
            ));
        }

        if self.database.password.is_empty() {
            return Err(ConfigError::Validation(
                "database.password is required. Set CIVIC_DATABASE__PASSWORD environment variable or configure in config.yaml.".into(),
            ));
        }

        if self.database.port == 0 {
            return Err(ConfigError::Validation(
                "database.port cannot be 0".into(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections cannot be 0".into(),
            ));
        }

        // CORS origins must be valid URLs or "*"
        for origin in &self.cors.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "cors.allowed_origins contains invalid origin '{origin}'. Must be '*' or start with http:// or https://"
                )));
            }
        }

        if self.cache.ttl_hours == 0 {
            return Err(ConfigError::Validation("cache.ttl_hours cannot be 0".into()));
        }

        if !(1..=250).contains(&self.congress.page_size) {
            return Err(ConfigError::Validation(format!(
                "congress.page_size must be between 1 and 250, got {}",
                self.congress.page_size
            )));
        }

        let timeouts = [
            ("congress.timeout_secs", self.congress.timeout_secs),
            ("news.timeout_secs", self.news.timeout_secs),
            ("video.timeout_secs", self.video.timeout_secs),
            ("zip_lookup.timeout_secs", self.zip_lookup.timeout_secs),
            ("datasets.timeout_secs", self.datasets.timeout_secs),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::Validation(format!("{name} cannot be 0")));
        }

        if self.news.default_days == 0 {
            return Err(ConfigError::Validation(
                "news.default_days cannot be 0".into(),
            ));
        }

        Ok(())
    }
}
