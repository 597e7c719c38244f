//! Observability utilities.

mod observer;
mod tracing;

pub use observer::{
    CollectingCrawlObserver, CrawlObserver, LoggingCrawlObserver, NoOpCrawlObserver,
};
pub use tracing::{crawl_span, init_tracing, SpanTimer, DEFAULT_FILTER};
