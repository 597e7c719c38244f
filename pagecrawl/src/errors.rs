//! Error types for the crawl pipeline.
//!
//! Failures are recovered as close to their origin as possible: a strategy
//! miss is absorbed by the extraction chain, a transient transport failure
//! is retried and then routed to the degraded fetch path. Only the errors in
//! [`CrawlError`] ever reach the caller, and always for a single URL.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Error raised by a single fetch attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure.
    #[error("network error: {0}")]
    Network(String),

    /// The attempt did not finish within its timeout.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// The body exceeded the configured maximum size.
    #[error("response body of {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Observed body size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A request header could not be encoded.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl FetchError {
    /// Whether another attempt may succeed.
    ///
    /// Header encoding failures are deterministic and never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidHeader { .. } | Self::TooLarge { .. })
    }

    /// Whether the failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the page may still be reachable through the degraded fetch.
    ///
    /// Only connection failures, timeouts and server-side (5xx) statuses
    /// qualify; a 4xx answer will not change with different headers.
    #[must_use]
    pub fn allows_degraded_fetch(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::TooLarge { .. } | Self::InvalidHeader { .. } => false,
        }
    }

    /// Creates a status error from a code.
    #[must_use]
    pub fn status(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();
        Self::Status { status, reason }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(Duration::ZERO);
        }
        if let Some(status) = err.status() {
            return Self::status(status.as_u16());
        }
        Self::Network(err.to_string())
    }
}

/// Reason a single extraction strategy produced no candidate.
///
/// Misses are expected and silently skipped by the extraction chain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionMiss {
    /// The site profile has no selectors for this strategy.
    #[error("no selectors configured")]
    NotConfigured,

    /// A selector failed to parse.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Nothing in the document matched.
    #[error("no matching content")]
    NoMatch,

    /// No Article/NewsArticle structured data was found.
    #[error("no structured article data")]
    NoStructuredData,

    /// Content was found but too short to accept.
    #[error("content too short: {length} < {required}")]
    TooShort {
        /// Length of the recovered text.
        length: usize,
        /// Length the strategy requires.
        required: usize,
    },
}

/// Error returned to callers for one URL.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The request itself is malformed. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Both the retried fetch and the degraded fallback fetch failed.
    #[error("failed to crawl {url}: {source}")]
    Transport {
        /// The URL being crawled.
        url: String,
        /// The last fetch failure.
        #[source]
        source: FetchError,
    },
}

impl CrawlError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Short machine-readable kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Transport { .. } => "transport",
        }
    }

    /// Whether a later crawl of the same URL might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidInput(_) => false,
            Self::Transport { source, .. } => source.is_retryable(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("kind".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Self::Transport { url, .. } = self {
            map.insert("url".to_string(), serde_json::json!(url));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_retryable() {
        assert!(FetchError::Network("reset".into()).is_retryable());
        assert!(FetchError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(FetchError::status(503).is_retryable());
        assert!(FetchError::status(404).is_retryable());
        assert!(!FetchError::InvalidHeader {
            name: "Referer".into(),
            reason: "bad".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_degraded_fetch_only_for_transient_failures() {
        assert!(FetchError::Network("reset".into()).allows_degraded_fetch());
        assert!(FetchError::Timeout(Duration::from_secs(45)).allows_degraded_fetch());
        assert!(FetchError::status(502).allows_degraded_fetch());
        assert!(!FetchError::status(403).allows_degraded_fetch());
        assert!(!FetchError::status(404).allows_degraded_fetch());
        assert!(!FetchError::TooLarge { size: 2, limit: 1 }.allows_degraded_fetch());
    }

    #[test]
    fn test_status_reason() {
        let err = FetchError::status(404);
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_timeout_display() {
        let err = FetchError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "request timed out after 1500ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_crawl_error_to_dict() {
        let err = CrawlError::Transport {
            url: "https://example.com".into(),
            source: FetchError::Network("refused".into()),
        };
        let dict = err.to_dict();
        assert_eq!(dict.get("kind"), Some(&serde_json::json!("transport")));
        assert_eq!(dict.get("url"), Some(&serde_json::json!("https://example.com")));
        assert!(err.is_retryable());

        let invalid = CrawlError::invalid_input("not a url");
        assert_eq!(invalid.kind(), "invalid_input");
        assert!(!invalid.is_retryable());
    }
}
