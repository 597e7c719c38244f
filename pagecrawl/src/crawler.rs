//! Single-page crawl: fetch, extract, normalize, chunk.

use std::sync::Arc;
use tracing::Instrument;

use crate::config::CrawlConfig;
use crate::errors::{CrawlError, FetchError};
use crate::extract::{extract_fallback, extract_page};
use crate::fetch::{
    build_fallback_headers, build_headers, fetch_with_retry, Fetcher, HttpFetcher, Sleeper,
    TokioSleeper,
};
use crate::models::{ContentChunk, ExtractionMethod};
use crate::observability::{crawl_span, CrawlObserver, NoOpCrawlObserver, SpanTimer};
use crate::profiles::{normalize_host, ProfileRegistry};
use crate::records::assemble_chunks;
use crate::utils::{generate_request_id, now_utc, validate_chunk_size, validate_url};

/// Crawls pages with a shared fetcher, clock, profile table and config.
///
/// A crawler holds no per-page state; one instance may serve any number
/// of concurrent crawls.
#[derive(Clone)]
pub struct PageCrawler {
    fetcher: Arc<dyn Fetcher>,
    sleeper: Arc<dyn Sleeper>,
    profiles: Arc<ProfileRegistry>,
    observer: Arc<dyn CrawlObserver>,
    config: CrawlConfig,
}

impl std::fmt::Debug for PageCrawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCrawler")
            .field("profiles", &self.profiles.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PageCrawler {
    /// Creates a crawler using HTTP, the tokio timer and the built-in
    /// profiles.
    pub fn new(config: CrawlConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    /// Creates a crawler around an existing fetcher.
    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            sleeper: Arc::new(TokioSleeper),
            profiles: Arc::new(ProfileRegistry::builtin()),
            observer: Arc::new(NoOpCrawlObserver),
            config,
        }
    }

    /// Sets the sleeper used for waits, backoff and batch pacing.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Sets the profile table.
    #[must_use]
    pub fn with_profiles(mut self, profiles: Arc<ProfileRegistry>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Sets the lifecycle observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Gets the profile table.
    #[must_use]
    pub fn profiles(&self) -> &Arc<ProfileRegistry> {
        &self.profiles
    }

    pub(crate) fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    /// Crawls one page and returns its chunks.
    ///
    /// `chunk_size` overrides the configured size. An empty result means
    /// no meaningful content could be recovered, including when the
    /// degraded fetch fails too. Errors are limited to invalid input and
    /// fetch failures that the degraded fetch cannot help with (client
    /// errors, oversized bodies, unencodable headers).
    pub async fn crawl_page(
        &self,
        url: &str,
        chunk_size: Option<usize>,
    ) -> Result<Vec<ContentChunk>, CrawlError> {
        let request_id = generate_request_id();
        let span = crawl_span(url, &request_id);

        async {
            let timer = SpanTimer::start();
            self.observer.on_crawl_start(url, &request_id);

            match self.crawl_inner(url, chunk_size, &request_id).await {
                Ok((method, chunks)) => {
                    tracing::info!(method = %method, chunks = chunks.len(), "extracted page");
                    self.observer.on_crawl_complete(
                        url,
                        &request_id,
                        timer.elapsed_ms(),
                        method,
                        chunks.len(),
                    );
                    Ok(chunks)
                }
                Err(error) => {
                    self.observer.on_crawl_error(url, &request_id, &error);
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn crawl_inner(
        &self,
        url: &str,
        chunk_size: Option<usize>,
        request_id: &str,
    ) -> Result<(ExtractionMethod, Vec<ContentChunk>), CrawlError> {
        let parsed = validate_url(url)?;
        let chunk_size = validate_chunk_size(chunk_size.unwrap_or(self.config.chunk_size))?;
        let host = normalize_host(parsed.host_str().unwrap_or_default());
        let profile = self.profiles.resolve(&host);

        let wait = profile.pre_fetch_wait();
        if !wait.is_zero() {
            tracing::debug!(host = %host, wait_ms = profile.pre_fetch_wait_ms, "waiting before fetch");
            self.sleeper.sleep(wait).await;
        }

        let headers = build_headers(&self.config.fetch, &profile);
        let fetched = fetch_with_retry(
            self.fetcher.as_ref(),
            self.sleeper.as_ref(),
            &self.config.retry,
            url,
            &headers,
            Some(self.config.fetch.timeout()),
            self.observer.as_ref(),
        )
        .await;

        match fetched {
            Ok(page) => {
                if !page.is_html() {
                    tracing::debug!(
                        content_type = page.content_type.as_deref().unwrap_or_default(),
                        "extracting from a non-HTML response"
                    );
                }
                if page.final_url != url {
                    tracing::debug!(final_url = %page.final_url, "followed redirects");
                }
                let candidate = extract_page(&page.body, url, &profile, &self.config);
                let chunks = assemble_chunks(url, &candidate, chunk_size, now_utc());
                Ok((candidate.method, chunks))
            }
            Err(error) if error.allows_degraded_fetch() => {
                self.observer.on_fallback(url, request_id, &error);
                Ok(self.crawl_degraded(url, chunk_size).await)
            }
            Err(source) => Err(CrawlError::Transport {
                url: url.to_string(),
                source,
            }),
        }
    }

    /// One fetch with minimal headers and no timeout, read by the fallback
    /// extractor.
    ///
    /// Never fails: a page that cannot be fetched this way, or that holds
    /// less than `fallback_min_length` characters, yields no chunks.
    async fn crawl_degraded(
        &self,
        url: &str,
        chunk_size: usize,
    ) -> (ExtractionMethod, Vec<ContentChunk>) {
        let headers = build_fallback_headers(&self.config.fetch);
        let page = match self.fetcher.fetch(url, &headers, None).await {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(error = %error, "degraded fetch failed, no content recovered");
                return (ExtractionMethod::Fallback, Vec::new());
            }
        };

        let candidate = extract_fallback(&page.body, url, &self.config);
        let length = candidate.text_len();
        if length < self.config.fallback_min_length {
            tracing::warn!(length, "minimal content from degraded fetch");
            return (candidate.method, Vec::new());
        }
        let chunks = assemble_chunks(url, &candidate, chunk_size, now_utc());
        (candidate.method, chunks)
    }
}
