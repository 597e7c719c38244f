//! Bounded retry with exponential backoff.

use std::collections::BTreeMap;
use std::time::Duration;

use super::{FetchedPage, Fetcher, Sleeper};
use crate::config::RetryPolicy;
use crate::errors::FetchError;

/// Callbacks for retry decisions.
pub trait RetryObserver: Send + Sync {
    /// Called after a failed attempt when another attempt will follow.
    fn on_retry(&self, _url: &str, _attempt: u32, _delay: Duration, _error: &FetchError) {}
}

impl RetryObserver for () {}

async fn attempt_once(
    fetcher: &dyn Fetcher,
    url: &str,
    headers: &BTreeMap<String, String>,
    timeout: Option<Duration>,
) -> Result<FetchedPage, FetchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(url, headers, timeout))
            .await
            .unwrap_or(Err(FetchError::Timeout(limit))),
        None => fetcher.fetch(url, headers, None).await,
    }
}

/// Fetches `url`, retrying retryable failures per `policy`.
///
/// Attempts are numbered from 1. After failed attempt `n` the sleeper is
/// asked for `policy.delay_after_attempt(n)` before attempt `n + 1`. The
/// last failure is returned once `policy.max_attempts` is exhausted or a
/// non-retryable failure occurs. An attempt that exceeds `timeout` is
/// abandoned and counted as a [`FetchError::Timeout`].
pub async fn fetch_with_retry<O>(
    fetcher: &dyn Fetcher,
    sleeper: &dyn Sleeper,
    policy: &RetryPolicy,
    url: &str,
    headers: &BTreeMap<String, String>,
    timeout: Option<Duration>,
    observer: &O,
) -> Result<FetchedPage, FetchError>
where
    O: RetryObserver + ?Sized,
{
    let mut attempt = 1;
    loop {
        match attempt_once(fetcher, url, headers, timeout).await {
            Ok(page) => {
                tracing::debug!(
                    url,
                    attempt,
                    status = page.status,
                    elapsed_ms = page.elapsed.as_millis() as u64,
                    "fetch succeeded"
                );
                return Ok(page);
            }
            Err(error) if error.is_retryable() && policy.allows_retry_after(attempt) => {
                let delay = policy.delay_after_attempt(attempt);
                tracing::warn!(
                    url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "fetch attempt failed, retrying"
                );
                observer.on_retry(url, attempt, delay, &error);
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                tracing::warn!(url, attempt, error = %error, "fetch failed");
                return Err(error);
            }
        }
    }
}
