//! Trait for the deposition API

use crate::metadata::Metadata;
use crate::types::{DepositionId, RemoteResponse};
use async_trait::async_trait;
use std::path::Path;

/// The remote calls the publication protocol needs
///
/// Implementations return `Err` only when no response was obtained at all
/// (connection failure, timeout, unreadable local file). A response with any
/// status code, including errors, is returned as `Ok`.
#[async_trait]
pub trait DepositApi: Send + Sync {
    /// Create an empty deposition (`POST deposit/depositions`)
    async fn create_deposition(&self) -> crate::Result<RemoteResponse>;

    /// Upload a content file to a deposition (`POST deposit/depositions/{id}/files`)
    ///
    /// The file is opened for this call only and closed when it returns.
    async fn upload_content(
        &self,
        deposition: &DepositionId,
        content: &Path,
    ) -> crate::Result<RemoteResponse>;

    /// Replace a deposition's metadata (`PUT deposit/depositions/{id}`)
    async fn attach_metadata(
        &self,
        deposition: &DepositionId,
        metadata: &Metadata,
    ) -> crate::Result<RemoteResponse>;

    /// Publish a deposition (`POST deposit/depositions/{id}/actions/publish`)
    async fn publish(&self, deposition: &DepositionId) -> crate::Result<RemoteResponse>;

    /// Search published records (`GET records?q=<query>`)
    async fn search_records(&self, query: &str) -> crate::Result<RemoteResponse>;
}
