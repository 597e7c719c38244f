//! Configuration types for fetching, retrying, extraction and batching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Desktop browser user agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// User agent used by the degraded fallback fetch.
pub const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent used when the site profile has none.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// User agent for the degraded fallback fetch.
    #[serde(default = "default_fallback_user_agent")]
    pub fallback_user_agent: String,
    /// Maximum response size in bytes.
    #[serde(default = "default_max_size")]
    pub max_response_size: usize,
    /// Headers sent with every primary fetch.
    #[serde(default = "default_base_headers")]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout_ms() -> u64 {
    45_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_fallback_user_agent() -> String {
    FALLBACK_USER_AGENT.to_string()
}

fn default_max_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_base_headers() -> BTreeMap<String, String> {
    [
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.9,vi;q=0.8"),
        ("Upgrade-Insecure-Requests", "1"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "none"),
        ("Cache-Control", "max-age=0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            fallback_user_agent: default_fallback_user_agent(),
            max_response_size: default_max_size(),
            headers: default_base_headers(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Retry policy for failed fetches.
///
/// Shared read-only across every fetch. The delay before attempt `k`
/// (`k >= 2`) is `base_delay * backoff_multiplier^(k-2)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff multiplier.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay to wait after `failed_attempt` (1-based) fails.
    #[must_use]
    pub fn delay_after_attempt(&self, failed_attempt: u32) -> Duration {
        let exponent = i32::try_from(failed_attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let millis = self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        if millis.is_finite() && millis > 0.0 {
            Duration::from_millis(millis.round() as u64)
        } else {
            Duration::ZERO
        }
    }

    /// Whether another attempt is allowed after `attempt` failed.
    #[must_use]
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchConfig {
    /// URLs crawled concurrently per group.
    #[serde(default = "default_concurrent")]
    pub max_concurrent: usize,
    /// Pause between groups in milliseconds.
    #[serde(default = "default_inter_batch_delay_ms")]
    pub inter_batch_delay_ms: u64,
}

fn default_concurrent() -> usize {
    2
}

fn default_inter_batch_delay_ms() -> u64 {
    3000
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_concurrent(),
            inter_batch_delay_ms: default_inter_batch_delay_ms(),
        }
    }
}

impl BatchConfig {
    /// Creates a new batch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum concurrent crawls.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Sets the inter-batch delay.
    #[must_use]
    pub fn with_inter_batch_delay_ms(mut self, delay: u64) -> Self {
        self.inter_batch_delay_ms = delay;
        self
    }

    /// Gets the inter-batch delay as Duration.
    #[must_use]
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }
}

/// Combined configuration for the page crawler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlConfig {
    /// Default maximum chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Minimum text length for a strategy candidate to be accepted.
    #[serde(default = "default_min_content")]
    pub min_content_length: usize,
    /// Minimum text length for the semantic strategy.
    #[serde(default = "default_semantic_min")]
    pub semantic_min_length: usize,
    /// Below this length the degraded fallback yields no chunks.
    #[serde(default = "default_fallback_min")]
    pub fallback_min_length: usize,
    /// Fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Retry policy.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Batch configuration.
    #[serde(default)]
    pub batch: BatchConfig,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_min_content() -> usize {
    100
}

fn default_semantic_min() -> usize {
    200
}

fn default_fallback_min() -> usize {
    50
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            min_content_length: default_min_content(),
            semantic_min_length: default_semantic_min(),
            fallback_min_length: default_fallback_min(),
            fetch: FetchConfig::default(),
            retry: RetryPolicy::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl CrawlConfig {
    /// Creates a new crawl configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the default chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the fetch configuration.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the batch configuration.
    #[must_use]
    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }
}
