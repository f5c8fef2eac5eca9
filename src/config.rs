//! Configuration types for batch-deposit
//!
//! A single [`Config`] is built once at process entry (usually through
//! [`Config::from_env`]) and handed by reference to the batch driver and the
//! retry executor. Nothing in the crate reads the environment after that.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Environment variable holding the deposition API access token
pub const TOKEN_ENV: &str = "ZENODO_TOKEN";
/// Environment variable overriding the pacing interval, in seconds
pub const RATE_LIMIT_ENV: &str = "ZENODO_RATE_LIMIT";
/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "ZENODO_API_URL";

/// Access token for the deposition API
///
/// Never serialized, and redacted from `Debug` output so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Remote repository connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API root, e.g. `https://zenodo.org/api` (default) or the sandbox
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every call (supplied via `ZENODO_TOKEN`)
    #[serde(skip)]
    pub access_token: Option<AccessToken>,

    /// Per-request timeout, including the content upload (default: 300 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            request_timeout: default_request_timeout(),
        }
    }
}

/// Retry configuration for remote calls
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per protocol step, including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after each failed attempt, indexed by attempt (default: 10s, 30s, 90s)
    ///
    /// When there are more retries than entries, the last entry is reused.
    #[serde(default = "default_backoff", with = "duration_vec_serde")]
    pub backoff: Vec<Duration>,
}

impl RetryConfig {
    /// Delay to wait after failed attempt number `attempt` (zero-based)
    ///
    /// Clamps to the last schedule entry; an empty schedule means no delay.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let index = attempt as usize;
        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Attempts actually made per step (`max_attempts`, but never zero)
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: default_backoff(),
        }
    }
}

/// Batch input layout, pacing and output settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory of metadata documents (default: "./metadata")
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,

    /// Directory of content files (default: "./pdf")
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Suffix stripped from a metadata file stem to get the item name (default: "_metadata")
    #[serde(default = "default_metadata_suffix")]
    pub metadata_suffix: String,

    /// Extension of metadata documents, without the dot (default: "json")
    #[serde(default = "default_metadata_extension")]
    pub metadata_extension: String,

    /// Extension of content files, without the dot (default: "pdf")
    #[serde(default = "default_content_extension")]
    pub content_extension: String,

    /// Delay between publications (default: 7 days)
    #[serde(default = "default_pacing_interval", with = "duration_serde")]
    pub pacing_interval: Duration,

    /// Also wait after the last item of the batch (default: false)
    #[serde(default)]
    pub pace_after_last: bool,

    /// Preview the batch without contacting the remote service
    #[serde(default)]
    pub dry_run: bool,

    /// Append-only CSV result log (default: "upload_log.csv")
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            content_dir: default_content_dir(),
            metadata_suffix: default_metadata_suffix(),
            metadata_extension: default_metadata_extension(),
            content_extension: default_content_extension(),
            pacing_interval: default_pacing_interval(),
            pace_after_last: false,
            dry_run: false,
            log_path: default_log_path(),
        }
    }
}

/// Main configuration for a batch run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote repository connection
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Retry policy applied to every protocol step
    #[serde(default)]
    pub retry: RetryConfig,

    /// Input layout, pacing and result log
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Build the default configuration with overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the default configuration with overrides from `lookup`
    ///
    /// Reads [`TOKEN_ENV`], [`RATE_LIMIT_ENV`] and [`API_URL_ENV`]. Blank values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(token) = get(TOKEN_ENV) {
            config.remote.access_token = Some(AccessToken::new(token.trim()));
        }

        if let Some(raw) = get(RATE_LIMIT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(
                    format!("{RATE_LIMIT_ENV} must be a whole number of seconds, got {raw:?}"),
                    RATE_LIMIT_ENV,
                )
            })?;
            config.batch.pacing_interval = Duration::from_secs(secs);
        }

        if let Some(url) = get(API_URL_ENV) {
            config.remote.base_url = url.trim().to_string();
        }

        Ok(config)
    }

    /// Check the configuration before any remote call is made
    ///
    /// A credential is only required when the batch will actually publish.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.remote.base_url).map_err(|e| {
            Error::config(
                format!("invalid base URL {:?}: {e}", self.remote.base_url),
                "base_url",
            )
        })?;

        if !self.batch.dry_run && self.remote.access_token.is_none() {
            return Err(Error::MissingCredential {
                var: TOKEN_ENV.to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(Error::config(
                "max_attempts must be at least 1",
                "max_attempts",
            ));
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://zenodo.org/api".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff() -> Vec<Duration> {
    vec![
        Duration::from_secs(10),
        Duration::from_secs(30),
        Duration::from_secs(90),
    ]
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from("./metadata")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("./pdf")
}

fn default_metadata_suffix() -> String {
    "_metadata".to_string()
}

fn default_metadata_extension() -> String {
    "json".to_string()
}

fn default_content_extension() -> String {
    "pdf".to_string()
}

fn default_pacing_interval() -> Duration {
    Duration::from_secs(7 * 24 * 60 * 60)
}

fn default_log_path() -> PathBuf {
    PathBuf::from("upload_log.csv")
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Backoff schedule as a list of seconds
mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serializer, ser::SerializeSeq};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(durations.len()))?;
        for d in durations {
            seq.serialize_element(&d.as_secs())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Vec::<u64>::deserialize(deserializer)?;
        Ok(secs.into_iter().map(Duration::from_secs).collect())
    }
}
