//! Shared test helpers: a scripted in-memory deposition API and input fixtures.

use crate::metadata::Metadata;
use crate::remote::DepositApi;
use crate::types::{DepositionId, RemoteResponse};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A scripted reply: a response, or a transport failure message
pub(crate) type Scripted = Result<RemoteResponse, String>;

/// One call made against [`ScriptedApi`]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Create,
    Upload {
        deposition: String,
        file_name: String,
        bytes: usize,
    },
    AttachMetadata {
        deposition: String,
        metadata: Value,
    },
    Publish {
        deposition: String,
    },
    Search {
        query: String,
    },
}

#[derive(Default)]
struct State {
    create: VecDeque<Scripted>,
    upload: VecDeque<Scripted>,
    attach: VecDeque<Scripted>,
    publish: VecDeque<Scripted>,
    search: VecDeque<Scripted>,
    calls: Vec<Call>,
    next_id: u64,
}

/// In-memory [`DepositApi`] that replays queued replies and records every call
///
/// When a queue is empty the call succeeds: creates hand out increasing ids
/// starting at 100, publishes return `10.5281/zenodo.<id>`, searches find nothing.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    state: Mutex<State>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn push_create(&self, reply: Scripted) {
        self.lock().create.push_back(reply);
    }

    pub(crate) fn push_upload(&self, reply: Scripted) {
        self.lock().upload.push_back(reply);
    }

    pub(crate) fn push_attach(&self, reply: Scripted) {
        self.lock().attach.push_back(reply);
    }

    pub(crate) fn push_publish(&self, reply: Scripted) {
        self.lock().publish.push_back(reply);
    }

    pub(crate) fn push_search(&self, reply: Scripted) {
        self.lock().search.push_back(reply);
    }

    /// All calls so far, in order
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of calls matching `predicate`
    pub(crate) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }
}

fn into_result(reply: Scripted) -> crate::Result<RemoteResponse> {
    reply.map_err(|msg| {
        crate::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            msg,
        ))
    })
}

#[async_trait]
impl DepositApi for ScriptedApi {
    async fn create_deposition(&self) -> crate::Result<RemoteResponse> {
        let mut state = self.lock();
        state.calls.push(Call::Create);
        let reply = match state.create.pop_front() {
            Some(reply) => reply,
            None => {
                let id = 100 + state.next_id;
                state.next_id += 1;
                Ok(RemoteResponse::new(201, json!({ "id": id }).to_string()))
            }
        };
        into_result(reply)
    }

    async fn upload_content(
        &self,
        deposition: &DepositionId,
        content: &Path,
    ) -> crate::Result<RemoteResponse> {
        // Opened and dropped per attempt, like the HTTP client
        let bytes = std::fs::read(content)?;
        let mut state = self.lock();
        state.calls.push(Call::Upload {
            deposition: deposition.to_string(),
            file_name: content
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            bytes: bytes.len(),
        });
        let reply = state
            .upload
            .pop_front()
            .unwrap_or_else(|| Ok(RemoteResponse::new(201, "{}")));
        into_result(reply)
    }

    async fn attach_metadata(
        &self,
        deposition: &DepositionId,
        metadata: &Metadata,
    ) -> crate::Result<RemoteResponse> {
        let mut state = self.lock();
        state.calls.push(Call::AttachMetadata {
            deposition: deposition.to_string(),
            metadata: Value::Object(metadata.as_map().clone()),
        });
        let reply = state
            .attach
            .pop_front()
            .unwrap_or_else(|| Ok(RemoteResponse::new(200, "{}")));
        into_result(reply)
    }

    async fn publish(&self, deposition: &DepositionId) -> crate::Result<RemoteResponse> {
        let mut state = self.lock();
        state.calls.push(Call::Publish {
            deposition: deposition.to_string(),
        });
        let reply = state.publish.pop_front().unwrap_or_else(|| {
            Ok(RemoteResponse::new(
                202,
                json!({ "doi": format!("10.5281/zenodo.{deposition}") }).to_string(),
            ))
        });
        into_result(reply)
    }

    async fn search_records(&self, query: &str) -> crate::Result<RemoteResponse> {
        let mut state = self.lock();
        state.calls.push(Call::Search {
            query: query.to_string(),
        });
        let reply = state.search.pop_front().unwrap_or_else(|| {
            Ok(RemoteResponse::new(
                200,
                json!({ "hits": { "hits": [] } }).to_string(),
            ))
        });
        into_result(reply)
    }
}

/// Metadata and content directories inside a temp dir
pub(crate) struct Fixture {
    pub(crate) dir: tempfile::TempDir,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("metadata")).unwrap();
        std::fs::create_dir_all(dir.path().join("pdf")).unwrap();
        Self { dir }
    }

    pub(crate) fn metadata_dir(&self) -> PathBuf {
        self.dir.path().join("metadata")
    }

    pub(crate) fn content_dir(&self) -> PathBuf {
        self.dir.path().join("pdf")
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.dir.path().join("upload_log.csv")
    }

    /// Write `<name>_metadata.json` with `metadata` as its text
    pub(crate) fn write_metadata(&self, name: &str, metadata: &str) -> PathBuf {
        let path = self.metadata_dir().join(format!("{name}_metadata.json"));
        std::fs::write(&path, metadata).unwrap();
        path
    }

    /// Write `<name>.pdf`
    pub(crate) fn write_content(&self, name: &str) -> PathBuf {
        let path = self.content_dir().join(format!("{name}.pdf"));
        std::fs::write(&path, format!("%PDF-1.4 {name}")).unwrap();
        path
    }

    /// Write both halves of an item
    pub(crate) fn write_pair(&self, name: &str, metadata: &str) -> crate::types::UploadItem {
        crate::types::UploadItem {
            name: name.to_string(),
            metadata_path: self.write_metadata(name, metadata),
            content_path: self.write_content(name),
        }
    }
}
