//! Retry logic with a fixed backoff schedule
//!
//! Every step of the publication protocol goes through [`send_with_retry`].
//! An attempt succeeds when the response status is one of
//! [`ACCEPTED_STATUSES`]; any other status, or an error raised while making the
//! call, is reported and retried until the attempt budget runs out. Exhaustion
//! is returned as `None`, not as an error: it ends the current item, never the
//! batch.
//!
//! # Example
//!
//! ```no_run
//! use batch_deposit::config::RetryConfig;
//! use batch_deposit::retry::send_with_retry;
//! use batch_deposit::types::{RemoteResponse, Step};
//!
//! # async fn example() {
//! let config = RetryConfig::default();
//! let response = send_with_retry(&config, Step::Publish, || async {
//!     // Your remote call here
//!     Ok::<_, batch_deposit::Error>(RemoteResponse::new(202, r#"{"doi": "10.5281/zenodo.1"}"#))
//! })
//! .await;
//! assert!(response.is_some());
//! # }
//! ```

use crate::config::RetryConfig;
use crate::types::{RemoteResponse, Step};
use crate::utils::describe_interval;
use std::future::Future;

/// Status codes the deposition API uses for success
pub const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 202];

/// Execute a remote call, retrying failed attempts on the configured schedule
///
/// # Arguments
///
/// * `config` - Attempt budget and backoff schedule
/// * `step` - Protocol step, used to label log events
/// * `operation` - Closure producing one attempt; called once per attempt
///
/// # Returns
///
/// The first accepted response, or `None` once `config.attempts()` attempts
/// have failed. No delay follows the final attempt.
pub async fn send_with_retry<F, Fut, E>(
    config: &RetryConfig,
    step: Step,
    mut operation: F,
) -> Option<RemoteResponse>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RemoteResponse, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.attempts();

    for attempt in 0..max_attempts {
        match operation().await {
            Ok(response) if response.is_accepted() => {
                if attempt > 0 {
                    tracing::info!(
                        step = %step,
                        attempts = attempt + 1,
                        "Remote call succeeded after retry"
                    );
                }
                return Some(response);
            }
            Ok(response) => {
                tracing::warn!(
                    step = %step,
                    attempt = attempt + 1,
                    max_attempts,
                    status = response.status,
                    body = %response.body,
                    "Remote call rejected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    step = %step,
                    attempt = attempt + 1,
                    max_attempts,
                    error = %e,
                    "Remote call failed"
                );
            }
        }

        if attempt + 1 < max_attempts {
            let delay = config.delay_for(attempt);
            tracing::info!(
                step = %step,
                delay = %describe_interval(delay),
                "Waiting before retry"
            );
            tokio::time::sleep(delay).await;
        }
    }

    tracing::error!(
        step = %step,
        attempts = max_attempts,
        "Remote call failed after all retry attempts exhausted"
    );
    None
}
