//! Batch driver
//!
//! Pairs every metadata document with its content file, publishes the pairs
//! one at a time in file-name order, logs each outcome, and waits the pacing
//! interval between publications.
//!
//! # Example
//!
//! ```no_run
//! use batch_deposit::batch::BatchDriver;
//! use batch_deposit::config::Config;
//! use batch_deposit::remote::HttpDepositApi;
//! use batch_deposit::result_log::ResultLog;
//!
//! # async fn example() -> batch_deposit::Result<()> {
//! let config = Config::from_env()?;
//! config.validate()?;
//!
//! let api = HttpDepositApi::new(&config.remote)?;
//! let mut log = ResultLog::open(&config.batch.log_path)?;
//! let report = BatchDriver::new(&config, &api).run(&mut log).await?;
//! println!("published {} of {}", report.published, report.total());
//! # Ok(())
//! # }
//! ```

use crate::config::{BatchConfig, Config};
use crate::error::{Error, Result};
use crate::remote::DepositApi;
use crate::result_log::ResultLog;
use crate::types::{AttemptOutcome, BatchReport, FailureReason, UploadItem};
use crate::utils::describe_interval;
use crate::workflow::PublicationWorkflow;
use std::path::Path;
use tracing::{info, warn};

/// Find every (metadata, content) pair in the configured directories
///
/// Metadata documents are the files in `metadata_dir` with the metadata
/// extension. The item name is the file stem with `metadata_suffix` removed;
/// the content path is `<content_dir>/<name>.<content_extension>`. Content
/// files are not checked here. Items are returned sorted by metadata file name.
///
/// # Errors
///
/// Returns [`Error::InputDirectory`] if `metadata_dir` cannot be listed.
pub async fn discover_items(batch: &BatchConfig) -> Result<Vec<UploadItem>> {
    let listing_error = |source| Error::InputDirectory {
        path: batch.metadata_dir.clone(),
        source,
    };

    let mut entries = tokio::fs::read_dir(&batch.metadata_dir)
        .await
        .map_err(listing_error)?;

    let mut metadata_paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(listing_error)? {
        let path = entry.path();
        if !has_extension(&path, &batch.metadata_extension) {
            continue;
        }
        // Follows symlinks, so a linked metadata document counts as a file
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => metadata_paths.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable metadata entry");
            }
        }
    }
    metadata_paths.sort();

    let mut items = Vec::with_capacity(metadata_paths.len());
    for metadata_path in metadata_paths {
        let Some(stem) = metadata_path.file_stem().and_then(|s| s.to_str()) else {
            warn!(path = %metadata_path.display(), "Skipping metadata file with non UTF-8 name");
            continue;
        };
        let name = stem
            .strip_suffix(batch.metadata_suffix.as_str())
            .unwrap_or(stem)
            .to_string();
        let content_path = batch
            .content_dir
            .join(format!("{name}.{}", batch.content_extension));

        items.push(UploadItem {
            name,
            content_path,
            metadata_path,
        });
    }

    Ok(items)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
}

/// Runs one batch to completion
pub struct BatchDriver<'a> {
    config: &'a Config,
    api: &'a dyn DepositApi,
}

impl<'a> BatchDriver<'a> {
    /// Create a driver for `config`, publishing through `api`
    pub fn new(config: &'a Config, api: &'a dyn DepositApi) -> Self {
        Self { config, api }
    }

    /// Discover the items and process every one of them
    ///
    /// Per-item failures are recorded and the batch moves on. Only an
    /// unreadable metadata directory or an unwritable log ends the batch early.
    pub async fn run(&self, log: &mut ResultLog) -> Result<BatchReport> {
        let items = discover_items(&self.config.batch).await?;
        self.run_items(&items, log).await
    }

    /// Process `items` in order, appending one log entry per item
    ///
    /// The pacing interval is waited out before each item that will be
    /// published or previewed, when an earlier item was. Items without a
    /// content file never trigger or consume a wait. After the final item the
    /// wait only happens with `pace_after_last`.
    pub async fn run_items(
        &self,
        items: &[UploadItem],
        log: &mut ResultLog,
    ) -> Result<BatchReport> {
        let batch = &self.config.batch;
        info!(
            count = items.len(),
            dir = %batch.metadata_dir.display(),
            dry_run = batch.dry_run,
            "Discovered items"
        );

        let mut report = BatchReport::default();
        let mut wait_pending = false;

        for item in items {
            let outcome = match self.missing_content(item).await {
                Some(outcome) => outcome,
                None => {
                    if wait_pending {
                        self.pace().await;
                        wait_pending = false;
                    }
                    self.process(item).await
                }
            };
            log.record(&item.name, &outcome)?;
            report.record(&outcome);
            wait_pending |= outcome.is_paced();
        }

        if wait_pending && batch.pace_after_last {
            self.pace().await;
        }

        info!(
            published = report.published,
            previewed = report.previewed,
            skipped = report.skipped,
            failed = report.failed,
            log = %log.path().display(),
            "Upload session complete"
        );
        Ok(report)
    }

    async fn pace(&self) {
        let interval = self.config.batch.pacing_interval;
        info!(wait = %describe_interval(interval), "Waiting before next upload");
        tokio::time::sleep(interval).await;
    }

    async fn missing_content(&self, item: &UploadItem) -> Option<AttemptOutcome> {
        let content_exists = tokio::fs::try_exists(&item.content_path)
            .await
            .unwrap_or(false);
        if content_exists {
            return None;
        }

        warn!(
            item = %item.name,
            path = %item.content_path.display(),
            "Missing content file, skipping"
        );
        Some(AttemptOutcome::Failed(FailureReason::MissingContent {
            path: item.content_path.clone(),
        }))
    }

    async fn process(&self, item: &UploadItem) -> AttemptOutcome {
        if self.config.batch.dry_run {
            info!(
                item = %item.name,
                path = %item.content_path.display(),
                "[DRY RUN] Would upload"
            );
            return AttemptOutcome::DryRun;
        }

        PublicationWorkflow::new(self.api, &self.config.retry)
            .run(item)
            .await
    }
}
