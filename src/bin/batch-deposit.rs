//! batch-deposit command line entry point
//!
//! Publishes every `<name>_metadata.json` / `<name>.pdf` pair found in the
//! input directories, one at a time, waiting the pacing interval in between.
//!
//! The access token is read from `ZENODO_TOKEN` (a `.env` file is honoured).
//! The pacing interval defaults to `ZENODO_RATE_LIMIT` seconds, or one week.

use batch_deposit::utils::describe_interval;
use batch_deposit::{Config, run_batch};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "batch-deposit")]
#[command(about = "Publish metadata/content pairs to a Zenodo-style repository")]
#[command(version)]
struct Cli {
    /// Seconds to wait between publications (overrides ZENODO_RATE_LIMIT)
    #[arg(short, long)]
    rate_limit: Option<u64>,

    /// Preview the batch without contacting the repository
    #[arg(long)]
    dry_run: bool,

    /// Directory holding the *_metadata.json documents
    #[arg(long)]
    metadata_dir: Option<PathBuf>,

    /// Directory holding the content files
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// CSV file the results are appended to
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Also wait the pacing interval after the last item
    #[arg(long)]
    pace_after_last: bool,

    /// Repository API base URL (overrides ZENODO_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(secs) = self.rate_limit {
            config.batch.pacing_interval = Duration::from_secs(secs);
        }
        if let Some(dir) = self.metadata_dir {
            config.batch.metadata_dir = dir;
        }
        if let Some(dir) = self.content_dir {
            config.batch.content_dir = dir;
        }
        if let Some(path) = self.log_file {
            config.batch.log_path = path;
        }
        if let Some(url) = self.base_url {
            config.remote.base_url = url;
        }
        config.batch.dry_run |= self.dry_run;
        config.batch.pace_after_last |= self.pace_after_last;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,batch_deposit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid environment");
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    info!(
        api = %config.remote.base_url,
        metadata_dir = %config.batch.metadata_dir.display(),
        content_dir = %config.batch.content_dir.display(),
        log = %config.batch.log_path.display(),
        dry_run = config.batch.dry_run,
        "Starting batch"
    );
    info!(
        pacing = %describe_interval(config.batch.pacing_interval),
        max_attempts = config.retry.max_attempts,
        backoff = ?config.retry.backoff,
        "Upload policy"
    );

    match run_batch(&config).await {
        Ok(report) => {
            info!(
                total = report.total(),
                published = report.published,
                previewed = report.previewed,
                skipped = report.skipped,
                failed = report.failed,
                "Batch finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Batch aborted");
            ExitCode::FAILURE
        }
    }
}
