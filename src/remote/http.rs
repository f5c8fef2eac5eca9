//! reqwest-backed deposition API client

use super::traits::DepositApi;
use crate::config::{AccessToken, RemoteConfig};
use crate::metadata::Metadata;
use crate::types::{DepositionId, RemoteResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use std::path::Path;
use tokio_util::io::ReaderStream;

/// Deposition API client over HTTP
///
/// Sends the access token as a bearer `Authorization` header on every call.
///
/// # Examples
///
/// ```no_run
/// use batch_deposit::config::{AccessToken, RemoteConfig};
/// use batch_deposit::remote::{DepositApi, HttpDepositApi};
///
/// # async fn example() -> batch_deposit::Result<()> {
/// let config = RemoteConfig {
///     base_url: "https://sandbox.zenodo.org/api".to_string(),
///     access_token: Some(AccessToken::new("token-from-the-environment")),
///     ..Default::default()
/// };
/// let api = HttpDepositApi::new(&config)?;
/// let created = api.create_deposition().await?;
/// assert_eq!(created.status, 201);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpDepositApi {
    client: Client,
    base_url: String,
    token: Option<AccessToken>,
}

impl HttpDepositApi {
    /// Build a client from the remote settings
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (for example, the TLS backend fails to initialize).
    pub fn new(config: &RemoteConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("batch-deposit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> crate::Result<RemoteResponse> {
        let response = self.authorize(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RemoteResponse::new(status, body))
    }
}

#[async_trait]
impl DepositApi for HttpDepositApi {
    async fn create_deposition(&self) -> crate::Result<RemoteResponse> {
        let request = self
            .client
            .post(self.endpoint("deposit/depositions"))
            .json(&serde_json::json!({}));
        self.send(request).await
    }

    async fn upload_content(
        &self,
        deposition: &DepositionId,
        content: &Path,
    ) -> crate::Result<RemoteResponse> {
        let file = tokio::fs::File::open(content).await?;
        let length = file.metadata().await?.len();
        let file_name = content
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "content".to_string());

        // The file handle lives inside the body stream and is dropped with the request
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, length)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);

        let request = self
            .client
            .post(self.endpoint(&format!("deposit/depositions/{deposition}/files")))
            .multipart(form);
        self.send(request).await
    }

    async fn attach_metadata(
        &self,
        deposition: &DepositionId,
        metadata: &Metadata,
    ) -> crate::Result<RemoteResponse> {
        let request = self
            .client
            .put(self.endpoint(&format!("deposit/depositions/{deposition}")))
            .json(&serde_json::json!({ "metadata": metadata.as_map() }));
        self.send(request).await
    }

    async fn publish(&self, deposition: &DepositionId) -> crate::Result<RemoteResponse> {
        let request = self.client.post(self.endpoint(&format!(
            "deposit/depositions/{deposition}/actions/publish"
        )));
        self.send(request).await
    }

    async fn search_records(&self, query: &str) -> crate::Result<RemoteResponse> {
        let request = self
            .client
            .get(self.endpoint("records"))
            .query(&[("q", query)]);
        self.send(request).await
    }
}
