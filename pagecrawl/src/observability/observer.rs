//! Crawl lifecycle callbacks.

use parking_lot::RwLock;
use std::time::Duration;
use tracing::{info, warn, Level};

use crate::errors::{CrawlError, FetchError};
use crate::fetch::RetryObserver;
use crate::models::ExtractionMethod;

/// Observability callbacks for page crawls.
///
/// Retry notifications arrive through the [`RetryObserver`] supertrait.
pub trait CrawlObserver: RetryObserver {
    /// Called before the first fetch attempt of a page.
    fn on_crawl_start(&self, url: &str, request_id: &str);

    /// Called when retries are exhausted and the degraded fetch begins.
    fn on_fallback(&self, url: &str, request_id: &str, error: &FetchError);

    /// Called when a page produced its chunks.
    fn on_crawl_complete(
        &self,
        url: &str,
        request_id: &str,
        duration_ms: f64,
        method: ExtractionMethod,
        chunks: usize,
    );

    /// Called when a page failed.
    fn on_crawl_error(&self, url: &str, request_id: &str, error: &CrawlError);
}

/// No-op implementation of [`CrawlObserver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCrawlObserver;

impl RetryObserver for NoOpCrawlObserver {}

impl CrawlObserver for NoOpCrawlObserver {
    fn on_crawl_start(&self, _url: &str, _request_id: &str) {}
    fn on_fallback(&self, _url: &str, _request_id: &str, _error: &FetchError) {}
    fn on_crawl_complete(
        &self,
        _url: &str,
        _request_id: &str,
        _duration_ms: f64,
        _method: ExtractionMethod,
        _chunks: usize,
    ) {
    }
    fn on_crawl_error(&self, _url: &str, _request_id: &str, _error: &CrawlError) {}
}

/// An observer that logs lifecycle events through `tracing`.
///
/// Start and completion log at the configured level; retries, fallbacks
/// and errors always log at `WARN`.
#[derive(Debug, Clone)]
pub struct LoggingCrawlObserver {
    level: Level,
}

impl Default for LoggingCrawlObserver {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingCrawlObserver {
    /// Creates a logging observer with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging observer.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl RetryObserver for LoggingCrawlObserver {
    fn on_retry(&self, url: &str, attempt: u32, delay: Duration, error: &FetchError) {
        warn!(
            url,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "retrying fetch"
        );
    }
}

impl CrawlObserver for LoggingCrawlObserver {
    fn on_crawl_start(&self, url: &str, request_id: &str) {
        if self.level == Level::DEBUG {
            tracing::debug!(url, request_id, "crawl started");
        } else {
            info!(url, request_id, "crawl started");
        }
    }

    fn on_fallback(&self, url: &str, request_id: &str, error: &FetchError) {
        warn!(url, request_id, error = %error, "retries exhausted, trying degraded fetch");
    }

    fn on_crawl_complete(
        &self,
        url: &str,
        request_id: &str,
        duration_ms: f64,
        method: ExtractionMethod,
        chunks: usize,
    ) {
        if self.level == Level::DEBUG {
            tracing::debug!(url, request_id, duration_ms, method = %method, chunks, "crawl complete");
        } else {
            info!(url, request_id, duration_ms, method = %method, chunks, "crawl complete");
        }
    }

    fn on_crawl_error(&self, url: &str, request_id: &str, error: &CrawlError) {
        warn!(url, request_id, kind = error.kind(), error = %error, "crawl failed");
    }
}

/// A collecting observer for tests.
///
/// Records each callback as a short event string such as `start`,
/// `retry:1`, `fallback`, `complete:3` or `error:transport`, keyed by URL.
#[derive(Debug, Default)]
pub struct CollectingCrawlObserver {
    events: RwLock<Vec<(String, String)>>,
}

impl CollectingCrawlObserver {
    /// Creates a new collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all `(url, event)` pairs in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.read().clone()
    }

    /// Returns the events recorded for `url`.
    #[must_use]
    pub fn events_for(&self, url: &str) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn record(&self, url: &str, event: String) {
        self.events.write().push((url.to_string(), event));
    }
}

impl RetryObserver for CollectingCrawlObserver {
    fn on_retry(&self, url: &str, attempt: u32, _delay: Duration, _error: &FetchError) {
        self.record(url, format!("retry:{attempt}"));
    }
}

impl CrawlObserver for CollectingCrawlObserver {
    fn on_crawl_start(&self, url: &str, _request_id: &str) {
        self.record(url, "start".to_string());
    }

    fn on_fallback(&self, url: &str, _request_id: &str, _error: &FetchError) {
        self.record(url, "fallback".to_string());
    }

    fn on_crawl_complete(
        &self,
        url: &str,
        _request_id: &str,
        _duration_ms: f64,
        _method: ExtractionMethod,
        chunks: usize,
    ) {
        self.record(url, format!("complete:{chunks}"));
    }

    fn on_crawl_error(&self, url: &str, _request_id: &str, error: &CrawlError) {
        self.record(url, format!("error:{}", error.kind()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpCrawlObserver;
        observer.on_crawl_start("https://example.com", "req-1");
        observer.on_retry("https://example.com", 1, Duration::from_secs(2), &FetchError::status(503));
        observer.on_crawl_complete("https://example.com", "req-1", 10.0, ExtractionMethod::Generic, 2);
        observer.on_crawl_error("https://example.com", "req-1", &CrawlError::invalid_input("bad"));
    }

    #[test]
    fn test_logging_observer_levels() {
        let observer = LoggingCrawlObserver::debug();
        observer.on_crawl_start("https://example.com", "req-1");
        observer.on_fallback("https://example.com", "req-1", &FetchError::Timeout(Duration::from_secs(45)));
        LoggingCrawlObserver::default().on_crawl_complete(
            "https://example.com",
            "req-1",
            5.0,
            ExtractionMethod::Semantic,
            1,
        );
    }

    #[test]
    fn test_collecting_observer() {
        let observer = CollectingCrawlObserver::new();
        observer.on_crawl_start("https://a.test/", "r1");
        observer.on_retry("https://a.test/", 1, Duration::ZERO, &FetchError::status(500));
        observer.on_crawl_start("https://b.test/", "r2");
        observer.on_crawl_complete("https://a.test/", "r1", 1.0, ExtractionMethod::Fallback, 3);

        assert_eq!(
            observer.events_for("https://a.test/"),
            vec!["start", "retry:1", "complete:3"]
        );
        assert_eq!(observer.events().len(), 4);
    }
}
