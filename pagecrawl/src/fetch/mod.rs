//! HTTP fetching with timeout, retry and backoff.
//!
//! The [`Fetcher`] trait is the seam between the pipeline and the network;
//! [`Sleeper`] is the seam between the pipeline and wall-clock time, so
//! retry backoff and batch pacing can be verified with a virtual clock.

mod http;
mod retry;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::errors::FetchError;

pub use http::{build_fallback_headers, build_headers, HttpFetcher};
pub use retry::{fetch_with_retry, RetryObserver};

/// A page body returned by a [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Status of the final response.
    pub status: u16,
    /// Decoded response body.
    pub body: String,
    /// URL after redirects.
    pub final_url: String,
    /// `Content-Type` header, if sent.
    pub content_type: Option<String>,
    /// Time spent on the request.
    pub elapsed: Duration,
}

impl FetchedPage {
    /// An HTML page served with status 200.
    #[must_use]
    pub fn html(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            final_url: url.into(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            elapsed: Duration::ZERO,
        }
    }

    /// Whether the server labelled the body as HTML or XHTML.
    ///
    /// A missing content type counts as HTML, since extraction is attempted
    /// regardless.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"))
    }
}

/// Protocol for HTTP fetching.
///
/// Implementations perform one attempt; retries live in
/// [`fetch_with_retry`]. A `None` timeout means no timeout is enforced.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the body, or a typed failure.
    ///
    /// Non-2xx responses are reported as [`FetchError::Status`].
    async fn fetch(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<FetchedPage, FetchError>;
}

/// Source of delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_page_is_html() {
        let page = FetchedPage::html("https://example.com", "<html></html>");
        assert!(page.is_html());

        let xhtml = FetchedPage {
            content_type: Some("Application/XHTML+XML".to_string()),
            ..page.clone()
        };
        assert!(xhtml.is_html());

        let json = FetchedPage {
            content_type: Some("application/json".to_string()),
            ..page.clone()
        };
        assert!(!json.is_html());

        let unlabelled = FetchedPage {
            content_type: None,
            ..page
        };
        assert!(unlabelled.is_html());
    }

    #[tokio::test]
    async fn test_tokio_sleeper_zero_returns() {
        TokioSleeper.sleep(Duration::ZERO).await;
        TokioSleeper.sleep(Duration::from_millis(1)).await;
    }
}
