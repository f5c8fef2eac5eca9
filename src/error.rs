//! Error types for batch-deposit
//!
//! Only batch-level problems surface as [`Error`] from the driver: a missing
//! credential, an unreadable metadata directory, a result log that cannot be
//! written. Everything that goes wrong while publishing a single item is
//! folded into [`FailureReason`](crate::types::FailureReason) so the batch
//! keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for batch-deposit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for batch-deposit
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "ZENODO_RATE_LIMIT")
        key: Option<String>,
    },

    /// The access credential was not supplied
    #[error("missing access credential: set {var} in the environment")]
    MissingCredential {
        /// Environment variable the credential is read from
        var: String,
    },

    /// The metadata directory could not be enumerated
    #[error("cannot read input directory {path}: {source}")]
    InputDirectory {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The metadata document is not a JSON object
    #[error("malformed metadata in {path}: {reason}")]
    MalformedMetadata {
        /// Path of the metadata document
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The result log could not be written
    #[error("result log error: {0}")]
    ResultLog(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote service answered with something we could not interpret
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
