use sqlx_core::migrate::Migrator;
use sqlx_postgres::{PgPool, PgPoolOptions};
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Connect to Postgres, retrying with backoff while it comes up, then run migrations.
///
/// # Errors
/// Returns an error when the database stays unreachable past the retry budget
/// or a migration fails.
pub async fn setup_database(config: &DatabaseConfig) -> Result<PgPool, anyhow::Error> {
    let retry_deadline = Duration::from_secs(60); // overall retry budget
    let max_interval = Duration::from_secs(30); // cap single waits
    let mut delay = Duration::from_millis(500);
    let start = Instant::now();
    let url = config.connection_url();

    let pool = loop {
        info!(host = %config.host, database = %config.name, "Attempting to connect to Postgres...");

        match PgPoolOptions::new()
            .max_connections(config.max_connections)
            // Allow extra time to acquire a connection during startup bursts
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await
        {
            Ok(pool) => break pool,
            Err(err) => {
                if start.elapsed() >= retry_deadline {
                    warn!(error = %err, "Postgres not ready; retries exhausted");
                    return Err(err.into());
                }

                warn!(error = %err, "Postgres not ready yet; retrying");
                sleep(delay).await;
                delay = (delay.saturating_mul(2)).min(max_interval);
            }
        }
    };

    run_migrations(&pool, config.migrations_dir.as_deref()).await?;
    Ok(pool)
}

/// Apply migrations from `dir`, or the crate's bundled `migrations/` directory.
///
/// # Errors
/// Returns an error if the directory cannot be read or a migration fails.
pub async fn run_migrations(pool: &PgPool, dir: Option<&str>) -> Result<(), anyhow::Error> {
    let migrations_path = dir.map_or_else(
        || PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations")),
        PathBuf::from,
    );
    let migrator = Migrator::new(Path::new(&migrations_path)).await?;
    migrator.run(pool).await?;
    info!(path = %migrations_path.display(), "Migrations applied");
    Ok(())
}
