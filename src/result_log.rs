//! Append-only CSV result log
//!
//! One row per processed item: `item,outcome,timestamp`. The file is opened
//! in append mode and never truncated, so rows from earlier runs are kept.
//! Each row is flushed as soon as it is written.

use crate::error::Result;
use crate::types::AttemptOutcome;
use chrono::{Local, SecondsFormat};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// One row of the result log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultLogEntry {
    /// Item name
    pub item: String,
    /// DOI on success, otherwise an outcome marker such as `FAILED`
    pub outcome: String,
    /// ISO-8601 local time the item finished
    pub timestamp: String,
}

impl ResultLogEntry {
    /// Entry for `item` stamped with the current local time
    pub fn now(item: impl Into<String>, outcome: &AttemptOutcome) -> Self {
        Self {
            item: item.into(),
            outcome: outcome.log_value().to_string(),
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

/// Writer for the result log
pub struct ResultLog {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl ResultLog {
    /// Open (or create) the log for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        Ok(Self { writer, path })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to disk
    pub fn append(&mut self, entry: &ResultLogEntry) -> Result<()> {
        self.writer
            .write_record([&entry.item, &entry.outcome, &entry.timestamp])?;
        self.writer.flush()?;
        tracing::debug!(item = %entry.item, outcome = %entry.outcome, "Result logged");
        Ok(())
    }

    /// Append the outcome of `item`, stamped now
    pub fn record(&mut self, item: &str, outcome: &AttemptOutcome) -> Result<ResultLogEntry> {
        let entry = ResultLogEntry::now(item, outcome);
        self.append(&entry)?;
        Ok(entry)
    }

    /// Read every entry from a log file
    ///
    /// Rows with fewer than three columns are skipped.
    pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<ResultLogEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let (Some(item), Some(outcome), Some(timestamp)) =
                (record.get(0), record.get(1), record.get(2))
            {
                entries.push(ResultLogEntry {
                    item: item.to_string(),
                    outcome: outcome.to_string(),
                    timestamp: timestamp.to_string(),
                });
            }
        }
        Ok(entries)
    }
}
