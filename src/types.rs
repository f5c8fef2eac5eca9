//! Core types for batch-deposit

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log value for a preview (dry run) item
pub const DRY_RUN_MARKER: &str = "DRY_RUN";
/// Log value for any failed item
pub const FAILED_MARKER: &str = "FAILED";
/// Log value for an item skipped because its DOI already exists
pub const SKIPPED_EXISTING_DOI_MARKER: &str = "SKIPPED_EXISTING_DOI";
/// Log value for a published item whose response carried no DOI
pub const PUBLISHED_WITHOUT_DOI_MARKER: &str = "PUBLISHED";

/// Opaque identifier of a remote deposition
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositionId(pub String);

impl DepositionId {
    /// Create a new DepositionId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read the `id` field of a create-deposition response
    ///
    /// The service returns a number, but a string is accepted as well.
    pub fn from_response(body: &serde_json::Value) -> Option<Self> {
        match body.get("id")? {
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            serde_json::Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DepositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One (content file, metadata document) pair to publish
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadItem {
    /// Item name, derived from the metadata file name
    pub name: String,
    /// Path to the content file
    pub content_path: PathBuf,
    /// Path to the metadata document
    pub metadata_path: PathBuf,
}

/// Status code and body of one remote call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RemoteResponse {
    /// Create a response from a status code and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status code counts as success for the deposition protocol
    pub fn is_accepted(&self) -> bool {
        crate::retry::ACCEPTED_STATUSES.contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// Position of an item in the publication protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Nothing has been sent yet
    Start,
    /// The remote deposition exists
    DepositionCreated,
    /// The content file is attached
    ContentUploaded,
    /// Metadata parsed, duplicate check done
    DuplicateCheck,
    /// Metadata attached to the deposition
    MetadataAttached,
    /// The record is public
    Published,
    /// Terminal: the item could not be published
    Failed,
    /// Terminal: the item was deliberately not published
    Skipped,
}

impl WorkflowState {
    /// Name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Start => "start",
            WorkflowState::DepositionCreated => "deposition_created",
            WorkflowState::ContentUploaded => "content_uploaded",
            WorkflowState::DuplicateCheck => "duplicate_check",
            WorkflowState::MetadataAttached => "metadata_attached",
            WorkflowState::Published => "published",
            WorkflowState::Failed => "failed",
            WorkflowState::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote protocol step, used to label retry attempts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Create the deposition
    CreateDeposition,
    /// Upload the content file
    UploadContent,
    /// Attach the metadata document
    AttachMetadata,
    /// Publish the deposition
    Publish,
}

impl Step {
    /// Name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateDeposition => "create_deposition",
            Step::UploadContent => "upload_content",
            Step::AttachMetadata => "attach_metadata",
            Step::Publish => "publish",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an item was skipped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A published record with this DOI already exists
    DuplicateIdentifier {
        /// The DOI found in the metadata
        doi: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DuplicateIdentifier { doi } => write!(f, "duplicate identifier {doi}"),
        }
    }
}

/// Why an item failed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The content file does not exist
    MissingContent {
        /// Where the content file was expected
        path: PathBuf,
    },
    /// A protocol step ran out of attempts
    RetriesExhausted {
        /// The step that never succeeded
        step: Step,
        /// Attempts made
        attempts: u32,
    },
    /// The metadata document could not be read or parsed
    MalformedMetadata {
        /// Parser or I/O error text
        reason: String,
    },
    /// The service accepted a call but its response was unusable
    UnexpectedResponse {
        /// The step whose response was unusable
        step: Step,
        /// What was missing or wrong
        reason: String,
    },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::MissingContent { path } => {
                write!(f, "missing content file {}", path.display())
            }
            FailureReason::RetriesExhausted { step, attempts } => {
                write!(f, "{step} failed after {attempts} attempts")
            }
            FailureReason::MalformedMetadata { reason } => write!(f, "malformed metadata: {reason}"),
            FailureReason::UnexpectedResponse { step, reason } => {
                write!(f, "unexpected {step} response: {reason}")
            }
        }
    }
}

/// Final result of one item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Published; carries the DOI (empty if the response had none)
    Published(String),
    /// Preview mode, nothing was sent
    DryRun,
    /// Deliberately not published
    Skipped(SkipReason),
    /// Could not be published
    Failed(FailureReason),
}

impl AttemptOutcome {
    /// Value written to the outcome column of the result log
    pub fn log_value(&self) -> &str {
        match self {
            AttemptOutcome::Published(doi) if doi.is_empty() => PUBLISHED_WITHOUT_DOI_MARKER,
            AttemptOutcome::Published(doi) => doi,
            AttemptOutcome::DryRun => DRY_RUN_MARKER,
            AttemptOutcome::Skipped(SkipReason::DuplicateIdentifier { .. }) => {
                SKIPPED_EXISTING_DOI_MARKER
            }
            AttemptOutcome::Failed(_) => FAILED_MARKER,
        }
    }

    /// Whether the batch should wait the pacing interval after this outcome
    ///
    /// Items that never reached the workflow (missing content) are not paced.
    pub fn is_paced(&self) -> bool {
        !matches!(
            self,
            AttemptOutcome::Failed(FailureReason::MissingContent { .. })
        )
    }
}

/// Per-outcome counts for a finished batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Items published
    pub published: usize,
    /// Items previewed in dry-run mode
    pub previewed: usize,
    /// Items skipped as duplicates
    pub skipped: usize,
    /// Items that failed, including missing content files
    pub failed: usize,
}

impl BatchReport {
    /// Count one outcome
    pub fn record(&mut self, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Published(_) => self.published += 1,
            AttemptOutcome::DryRun => self.previewed += 1,
            AttemptOutcome::Skipped(_) => self.skipped += 1,
            AttemptOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total items processed
    pub fn total(&self) -> usize {
        self.published + self.previewed + self.skipped + self.failed
    }
}
