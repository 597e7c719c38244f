//! # Pagecrawl
//!
//! Resilient web page content extraction and chunking.
//!
//! Given a URL, pagecrawl fetches the page, recovers its readable content
//! through an ordered chain of extraction strategies, normalizes the text
//! and splits it into bounded chunks ready for indexing:
//!
//! - **Fetching**: per-attempt timeout, bounded retry with exponential
//!   backoff, and a degraded fallback fetch when retries run out
//! - **Site profiles**: per-domain selectors, waits and header overrides
//! - **Extraction**: site selectors, JSON-LD articles, semantic containers
//!   and generic chrome stripping, with script-string and whole-body
//!   fallbacks
//! - **Chunking**: paragraph then sentence packing under a size limit
//! - **Batching**: bounded concurrency with pacing between groups
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagecrawl::prelude::*;
//!
//! let crawler = PageCrawler::new(CrawlConfig::default())?;
//! let chunks = crawler.crawl_page("https://example.com/post", None).await?;
//!
//! let outcomes = crawler
//!     .crawl_many(&["https://a.example/", "https://b.example/"], Some(800))
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod batch;
pub mod config;
pub mod crawler;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod observability;
pub mod profiles;
pub mod records;
pub mod testing;
pub mod text;
pub mod utils;


/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::plan_batches;
    pub use crate::config::{BatchConfig, CrawlConfig, FetchConfig, RetryPolicy};
    pub use crate::crawler::PageCrawler;
    pub use crate::errors::{CrawlError, ExtractionMiss, FetchError};
    pub use crate::extract::{extract_page, Strategy};
    pub use crate::fetch::{Fetcher, HttpFetcher, Sleeper, TokioSleeper};
    pub use crate::models::{
        ChunkMetadata, ContentChunk, CrawlOutcome, ExtractionCandidate, ExtractionMethod,
        PageMetadata,
    };
    pub use crate::observability::{
        init_tracing, CrawlObserver, LoggingCrawlObserver, NoOpCrawlObserver,
    };
    pub use crate::profiles::{normalize_host, ProfileRegistry, SiteProfile};
    pub use crate::text::{chunk_text, detect_language, normalize};
}
