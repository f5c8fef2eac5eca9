//! Per-item publication workflow
//!
//! Drives one [`UploadItem`] through the deposition protocol:
//!
//! ```text
//! Start -> DepositionCreated -> ContentUploaded -> DuplicateCheck
//!       -> MetadataAttached -> Published
//! ```
//!
//! Any step can end the item in `Failed` or `Skipped`. Remote calls go through
//! the retry executor; malformed metadata fails immediately without retry.
//! Each run starts fresh at `Start`; nothing is resumed across runs.

use crate::config::RetryConfig;
use crate::duplicate::identifier_exists;
use crate::metadata::Metadata;
use crate::remote::DepositApi;
use crate::retry::send_with_retry;
use crate::types::{
    AttemptOutcome, DepositionId, FailureReason, RemoteResponse, SkipReason, Step, UploadItem,
    WorkflowState,
};
use tracing::{debug, info, warn};

/// Why a run stopped before publishing
enum Halt {
    Skipped(SkipReason),
    Failed(FailureReason),
}

/// Publishes items through a [`DepositApi`]
pub struct PublicationWorkflow<'a> {
    api: &'a dyn DepositApi,
    retry: &'a RetryConfig,
}

impl<'a> PublicationWorkflow<'a> {
    /// Create a workflow over `api` using the `retry` policy for every step
    pub fn new(api: &'a dyn DepositApi, retry: &'a RetryConfig) -> Self {
        Self { api, retry }
    }

    /// Run the full protocol for one item and report its outcome
    ///
    /// The content file is expected to exist; the batch driver checks this
    /// before creating a workflow run.
    pub async fn run(&self, item: &UploadItem) -> AttemptOutcome {
        match self.drive(item).await {
            Ok(doi) => {
                info!(item = %item.name, doi = %doi, "Published");
                AttemptOutcome::Published(doi)
            }
            Err(Halt::Skipped(reason)) => {
                info!(item = %item.name, state = %WorkflowState::Skipped, reason = %reason, "Skipped");
                AttemptOutcome::Skipped(reason)
            }
            Err(Halt::Failed(reason)) => {
                warn!(item = %item.name, state = %WorkflowState::Failed, reason = %reason, "Failed");
                AttemptOutcome::Failed(reason)
            }
        }
    }

    async fn drive(&self, item: &UploadItem) -> Result<String, Halt> {
        debug!(item = %item.name, state = %WorkflowState::Start, "Starting publication");

        let deposition = self.create_deposition().await?;
        debug!(
            item = %item.name,
            deposition_id = %deposition,
            state = %WorkflowState::DepositionCreated,
            "Deposition created"
        );

        self.upload_content(&deposition, item).await?;
        debug!(
            item = %item.name,
            deposition_id = %deposition,
            state = %WorkflowState::ContentUploaded,
            "Content uploaded"
        );

        let metadata = self.check_metadata(&deposition, item).await?;
        debug!(
            item = %item.name,
            deposition_id = %deposition,
            state = %WorkflowState::DuplicateCheck,
            "Metadata ready"
        );

        self.attach_metadata(&deposition, &metadata).await?;
        debug!(
            item = %item.name,
            deposition_id = %deposition,
            state = %WorkflowState::MetadataAttached,
            "Metadata attached"
        );

        let doi = self.publish(&deposition).await?;
        debug!(
            item = %item.name,
            deposition_id = %deposition,
            state = %WorkflowState::Published,
            "Deposition published"
        );
        Ok(doi)
    }

    async fn create_deposition(&self) -> Result<DepositionId, Halt> {
        let response = self
            .retrying(Step::CreateDeposition, || self.api.create_deposition())
            .await?;

        let body = response.json().map_err(|e| {
            Halt::Failed(unexpected(
                Step::CreateDeposition,
                format!("unreadable body: {e}"),
            ))
        })?;
        DepositionId::from_response(&body).ok_or_else(|| {
            Halt::Failed(unexpected(
                Step::CreateDeposition,
                "response has no deposition id".to_string(),
            ))
        })
    }

    async fn upload_content(
        &self,
        deposition: &DepositionId,
        item: &UploadItem,
    ) -> Result<(), Halt> {
        self.retrying(Step::UploadContent, || {
            self.api.upload_content(deposition, &item.content_path)
        })
        .await
        .map(|_| ())
    }

    async fn check_metadata(
        &self,
        deposition: &DepositionId,
        item: &UploadItem,
    ) -> Result<Metadata, Halt> {
        let metadata = Metadata::load(&item.metadata_path).await.map_err(|e| {
            Halt::Failed(FailureReason::MalformedMetadata {
                reason: e.to_string(),
            })
        })?;

        if let Some(doi) = metadata.doi()
            && identifier_exists(self.api, &doi).await
        {
            // No delete call in the protocol; the draft stays behind unpublished
            warn!(
                item = %item.name,
                deposition_id = %deposition,
                doi = %doi,
                "DOI already published, abandoning unpublished deposition"
            );
            return Err(Halt::Skipped(SkipReason::DuplicateIdentifier { doi }));
        }

        Ok(metadata)
    }

    async fn attach_metadata(
        &self,
        deposition: &DepositionId,
        metadata: &Metadata,
    ) -> Result<(), Halt> {
        self.retrying(Step::AttachMetadata, || {
            self.api.attach_metadata(deposition, metadata)
        })
        .await
        .map(|_| ())
    }

    async fn publish(&self, deposition: &DepositionId) -> Result<String, Halt> {
        let response = self
            .retrying(Step::Publish, || self.api.publish(deposition))
            .await?;

        // Already public at this point, so a missing DOI is not a failure
        let doi = response
            .json()
            .ok()
            .and_then(|body| body.get("doi").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_default();
        if doi.is_empty() {
            warn!(deposition_id = %deposition, "Publish response carried no DOI");
        }
        Ok(doi)
    }

    async fn retrying<F, Fut>(&self, step: Step, operation: F) -> Result<RemoteResponse, Halt>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = crate::Result<RemoteResponse>>,
    {
        send_with_retry(self.retry, step, operation)
            .await
            .ok_or_else(|| {
                Halt::Failed(FailureReason::RetriesExhausted {
                    step,
                    attempts: self.retry.attempts(),
                })
            })
    }
}

fn unexpected(step: Step, reason: String) -> FailureReason {
    FailureReason::UnexpectedResponse { step, reason }
}
