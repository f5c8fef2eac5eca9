//! Remote deposition repository access
//!
//! The workflow never talks to reqwest directly. It goes through the
//! [`DepositApi`] trait, which models the five calls of a Zenodo-style
//! deposition API:
//!
//! - [`HttpDepositApi`]: the real client, built on reqwest
//! - a scripted in-memory double used by the crate's own tests
//!
//! Every call returns the raw [`RemoteResponse`](crate::types::RemoteResponse);
//! deciding whether a status code counts as success is the retry executor's job.
//!
//! ## Usage
//!
//! ```no_run
//! use batch_deposit::config::RemoteConfig;
//! use batch_deposit::remote::{DepositApi, HttpDepositApi};
//!
//! # async fn example() -> batch_deposit::Result<()> {
//! let api = HttpDepositApi::new(&RemoteConfig::default())?;
//! let response = api.search_records("doi:\"10.5281/zenodo.123\"").await?;
//! println!("search returned HTTP {}", response.status);
//! # Ok(())
//! # }
//! ```

mod http;
mod traits;

pub use http::HttpDepositApi;
pub use traits::DepositApi;
