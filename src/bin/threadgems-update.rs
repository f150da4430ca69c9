//! Snapshot updater: fetches design threads from the Threads API and
//! publishes the static JSON files the front end reads.
//!
//! Exits with status 1 when nothing was fetched or the output could not be
//! written.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use threadgems::config::UpdaterConfig;
use threadgems::persistence;
use threadgems::service::{RunOutcome, Updater};
use threadgems::snapshot::SnapshotWriter;
use threadgems::telemetry;
use threadgems::threads::ThreadsClient;

#[derive(Debug, Parser)]
#[command(name = "threadgems-update")]
#[command(about = "Refresh the curated design-thread snapshot")]
struct Cli {
    /// Directory receiving the snapshot files (overrides OUTPUT_DIR).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Posts requested per account (overrides POSTS_PER_ACCOUNT).
    #[arg(long)]
    limit: Option<u32>,

    /// Comma-separated accounts to fetch instead of the defaults.
    #[arg(long, value_delimiter = ',')]
    accounts: Vec<String>,

    /// Skip the document store even when DATABASE_URL is set.
    #[arg(long)]
    skip_store: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = UpdaterConfig::from_env().context("loading updater configuration")?;
    telemetry::init(config.log_json);

    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(limit) = cli.limit {
        config.posts_per_account = limit;
    }
    if cli.skip_store {
        config.database = None;
    }

    let client = ThreadsClient::new(&config.api).context("building Threads client")?;
    let store = persistence::connect_optional(config.database.as_ref()).await;

    let mut updater = Updater::new(
        client,
        config.access_token,
        config.posts_per_account,
        SnapshotWriter::new(config.output_dir),
        store,
    );
    if !cli.accounts.is_empty() {
        updater = updater.with_accounts(cli.accounts);
    }

    let mut rng = StdRng::from_os_rng();
    match updater.run(&mut rng).await {
        Ok(RunOutcome::Published(_)) => Ok(ExitCode::SUCCESS),
        Ok(RunOutcome::NothingFetched) => Ok(ExitCode::FAILURE),
        Err(e) => {
            tracing::error!(error = %e, "update failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
