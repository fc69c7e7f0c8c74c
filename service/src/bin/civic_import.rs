//! Load the public datasets into the document store and refresh cached
//! provider data in bulk.
//!
//! Usage: `cargo run --bin civic-import -- <command> [options]`

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use std::{sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use civicdata_api::{
    config::Config,
    db::setup_database,
    http::ApiContext,
    import::{DatasetSource, Importer, SourceReader, DEFAULT_CONGRESS},
    services::RefreshOptions,
    store::{DocumentStore, PgDocumentStore},
};

#[derive(Parser)]
#[command(name = "civic-import")]
#[command(about = "Import legislator datasets and refresh cached provider data")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Current members of Congress (replaces all people unless --no-clear)
    Legislators {
        #[arg(long)]
        no_clear: bool,
    },
    /// Current governors
    Governors {
        /// Remove existing governor documents first
        #[arg(long)]
        clear: bool,
        /// File path or URL overriding the configured dataset
        #[arg(long)]
        source: Option<String>,
    },
    /// Committees and committee memberships
    Committees {
        #[arg(long)]
        no_clear: bool,
    },
    /// GovTrack ideology and leadership scores
    Ideology {
        #[arg(long, default_value_t = DEFAULT_CONGRESS)]
        congress: u32,
    },
    /// Refresh legislation summaries from Congress.gov
    Legislation {
        /// Refresh entries that are still fresh
        #[arg(long)]
        force: bool,
        #[arg(long)]
        limit: Option<usize>,
        /// Pause between people (defaults to the configured request delay)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Refresh news mentions, never-updated people first
    News {
        #[arg(long, default_value_t = 100)]
        limit: usize,
        /// Look-back window (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
}

fn print_report<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .init();

    let pool = setup_database(&config.database).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));
    let datasets = &config.datasets;

    let importer = || -> anyhow::Result<Importer> {
        let reader = SourceReader::new(datasets.timeout_secs)?;
        Ok(Importer::new(Arc::clone(&store), reader))
    };

    match args.command {
        Command::Legislators { no_clear } => {
            let source = DatasetSource::parse(&datasets.legislators);
            let report = importer()?.legislators(&source, !no_clear).await?;
            print_report(&report)?;
        }
        Command::Governors { clear, source } => {
            let source = DatasetSource::parse(source.as_deref().unwrap_or(&datasets.governors));
            let report = importer()?.governors(&source, clear).await?;
            print_report(&report)?;
        }
        Command::Committees { no_clear } => {
            let (committees, memberships) = importer()?
                .committees(
                    &DatasetSource::parse(&datasets.committees),
                    &DatasetSource::parse(&datasets.committee_membership),
                    !no_clear,
                )
                .await?;
            print_report(&committees)?;
            print_report(&memberships)?;
        }
        Command::Ideology { congress } => {
            let report = importer()?
                .ideology(&datasets.govtrack_base, congress)
                .await?;
            print_report(&report)?;
        }
        Command::Legislation {
            force,
            limit,
            delay_ms,
        } => {
            let context = ApiContext::from_config(&config, Arc::clone(&store))?;
            let options = RefreshOptions {
                force,
                limit,
                delay: delay_ms.map(Duration::from_millis),
            };
            let report = context.legislation.refresh_many(&options).await?;
            print_report(&report)?;
        }
        Command::News {
            limit,
            days,
            delay_ms,
        } => {
            let context = ApiContext::from_config(&config, Arc::clone(&store))?;
            let days = days.unwrap_or_else(|| context.media.default_news_days());
            let report = context
                .media
                .news_backlog(limit, days, Duration::from_millis(delay_ms))
                .await?;
            print_report(&report)?;
        }
    }

    Ok(())
}
