//! Input directory fixtures

use batch_deposit::config::{AccessToken, Config, RetryConfig};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Metadata document carrying a DOI that the repository may already hold
pub const METADATA_WITH_DOI: &str = r#"{
  "title": "Paper A",
  "upload_type": "publication",
  "publication_type": "article",
  "creators": [{"name": "Doe, Jane"}],
  "doi": "10.5281/zenodo.123"
}"#;

/// Metadata document without a DOI
pub const METADATA_WITHOUT_DOI: &str = r#"{
  "title": "Paper B",
  "upload_type": "publication",
  "publication_type": "article",
  "creators": [{"name": "Roe, Richard"}]
}"#;

/// Temp workspace with `metadata/` and `pdf/` directories
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("metadata")).unwrap();
        std::fs::create_dir_all(dir.path().join("pdf")).unwrap();
        Self { dir }
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("upload_log.csv")
    }

    /// Write `metadata/<name>_metadata.json`
    pub fn add_metadata(&self, name: &str, metadata: &str) {
        let path = self
            .dir
            .path()
            .join("metadata")
            .join(format!("{name}_metadata.json"));
        std::fs::write(path, metadata).unwrap();
    }

    /// Write `pdf/<name>.pdf`
    pub fn add_content(&self, name: &str) {
        let path = self.dir.path().join("pdf").join(format!("{name}.pdf"));
        std::fs::write(path, format!("%PDF-1.4\n% {name}\n")).unwrap();
    }

    pub fn add_pair(&self, name: &str, metadata: &str) {
        self.add_metadata(name, metadata);
        self.add_content(name);
    }

    /// Config pointing at this workspace and `base_url`, with no waiting
    pub fn config(&self, base_url: &str) -> Config {
        let mut config = Config::default();
        config.remote.base_url = base_url.to_string();
        config.remote.access_token = Some(AccessToken::new("integration-token"));
        config.retry = RetryConfig {
            max_attempts: 3,
            backoff: vec![Duration::ZERO],
        };
        config.batch.metadata_dir = self.dir.path().join("metadata");
        config.batch.content_dir = self.dir.path().join("pdf");
        config.batch.log_path = self.log_path();
        config.batch.pacing_interval = Duration::ZERO;
        config
    }
}
