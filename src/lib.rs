//! # batch-deposit
//!
//! Paced, retrying batch publisher for Zenodo-style deposition repositories.
//!
//! ## Design Philosophy
//!
//! batch-deposit is designed to be:
//! - **Unattended** - Long batches run to completion; one bad item never stops the rest
//! - **Sensible defaults** - Three attempts per step, 10/30/90 second backoff, weekly pacing
//! - **Traceable** - Every item ends in exactly one row of an append-only CSV log
//! - **Testable** - The remote service sits behind the [`DepositApi`] trait
//!
//! Each item is a metadata document `<name>_metadata.json` paired with a content
//! file `<name>.pdf`. Publishing one item takes four remote calls (create a
//! deposition, upload the content, attach the metadata, publish), with a
//! duplicate-DOI search before the metadata is attached.
//!
//! ## Quick Start
//!
//! ```no_run
//! use batch_deposit::{Config, run_batch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads ZENODO_TOKEN, ZENODO_RATE_LIMIT and ZENODO_API_URL
//!     let mut config = Config::from_env()?;
//!     config.batch.dry_run = true;
//!
//!     let report = run_batch(&config).await?;
//!     println!("{} items previewed", report.previewed);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Batch discovery and the pacing driver
pub mod batch;
/// Configuration types
pub mod config;
/// Duplicate DOI detection
pub mod duplicate;
/// Error types
pub mod error;
/// Metadata documents
pub mod metadata;
/// Remote deposition API client
pub mod remote;
/// Append-only CSV result log
pub mod result_log;
/// Retry executor with a fixed backoff schedule
pub mod retry;
/// Core types and outcomes
pub mod types;
/// Utility functions
pub mod utils;
/// Per-item publication workflow
pub mod workflow;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use batch::{BatchDriver, discover_items};
pub use config::{AccessToken, BatchConfig, Config, RemoteConfig, RetryConfig};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use remote::{DepositApi, HttpDepositApi};
pub use result_log::{ResultLog, ResultLogEntry};
pub use types::{
    AttemptOutcome, BatchReport, DepositionId, FailureReason, RemoteResponse, SkipReason, Step,
    UploadItem, WorkflowState,
};
pub use workflow::PublicationWorkflow;

/// Validate `config` and run one batch against the configured HTTP endpoint
///
/// Lists the metadata directory, then opens the result log at
/// `config.batch.log_path` for appending, builds an [`HttpDepositApi`] and
/// drives every discovered item to an outcome.
///
/// # Errors
///
/// Fails before any remote call if the configuration is invalid (for example
/// the access token is missing outside dry-run mode), the metadata directory
/// cannot be listed, or the log cannot be opened. The log file is not created
/// when the directory listing fails.
pub async fn run_batch(config: &Config) -> Result<BatchReport> {
    config.validate()?;

    let items = discover_items(&config.batch).await?;
    let api = HttpDepositApi::new(&config.remote)?;
    let mut log = ResultLog::open(&config.batch.log_path)?;

    BatchDriver::new(config, &api)
        .run_items(&items, &mut log)
        .await
}
