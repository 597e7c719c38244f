//! Batch crawling with bounded concurrency and inter-batch pacing.

use futures::future::join_all;
use std::ops::Range;

use crate::config::BatchConfig;
use crate::crawler::PageCrawler;
use crate::models::CrawlOutcome;

/// Splits `len` items into consecutive groups of at most `max_concurrent`.
///
/// A zero limit is treated as one.
#[must_use]
pub fn plan_batches(len: usize, max_concurrent: usize) -> Vec<Range<usize>> {
    let size = max_concurrent.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

impl PageCrawler {
    /// Crawls `urls` using the configured batch settings.
    pub async fn crawl_many<S: AsRef<str>>(
        &self,
        urls: &[S],
        chunk_size: Option<usize>,
    ) -> Vec<CrawlOutcome> {
        let batch = self.config().batch.clone();
        self.crawl_many_with(urls, &batch, chunk_size).await
    }

    /// Crawls `urls` in groups of `batch.max_concurrent`.
    ///
    /// Pages within a group run concurrently; groups run one after another
    /// with `batch.inter_batch_delay` between them. Outcomes are returned
    /// in input order and a failed URL never affects its siblings.
    pub async fn crawl_many_with<S: AsRef<str>>(
        &self,
        urls: &[S],
        batch: &BatchConfig,
        chunk_size: Option<usize>,
    ) -> Vec<CrawlOutcome> {
        let groups = plan_batches(urls.len(), batch.max_concurrent);
        let group_count = groups.len();
        let mut outcomes = Vec::with_capacity(urls.len());

        for (number, group) in groups.into_iter().enumerate() {
            tracing::info!(
                batch = number + 1,
                of = group_count,
                urls = group.len(),
                "crawling batch"
            );
            let pending = urls[group].iter().map(|url| async move {
                let url = url.as_ref();
                CrawlOutcome {
                    url: url.to_string(),
                    result: self.crawl_page(url, chunk_size).await,
                }
            });
            outcomes.extend(join_all(pending).await);

            if number + 1 < group_count {
                self.sleeper().sleep(batch.inter_batch_delay()).await;
            }
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        tracing::info!(total = outcomes.len(), failed, "batch crawl finished");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::errors::FetchError;
    use crate::profiles::ProfileRegistry;
    use crate::testing::{
        assert_outcome_failed, assert_outcome_succeeded, fixtures, RecordingSleeper, StubEvent,
        StubFetcher,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_plan_batches() {
        assert_eq!(plan_batches(5, 2), vec![0..2, 2..4, 4..5]);
        assert_eq!(plan_batches(4, 2), vec![0..2, 2..4]);
        assert_eq!(plan_batches(3, 0), vec![0..1, 1..2, 2..3]);
        assert!(plan_batches(0, 2).is_empty());
        assert_eq!(plan_batches(2, 10), vec![0..2]);
    }

    #[tokio::test]
    async fn test_groups_pace_and_preserve_order() {
        let urls: Vec<String> = (0..5).map(|i| format!("https://site{i}.test/page")).collect();
        let mut stub = StubFetcher::new();
        for url in &urls {
            stub = stub.with_page(url, fixtures::long_article_page(2));
        }
        // The first URL of each group finishes last.
        let stub = stub
            .with_delay(&urls[0], Duration::from_millis(40))
            .with_delay(&urls[2], Duration::from_millis(40));
        let fetcher = Arc::new(stub);
        let sleeper = Arc::new(RecordingSleeper::new());
        let crawler = PageCrawler::with_fetcher(fetcher.clone(), CrawlConfig::default())
            .with_sleeper(sleeper.clone())
            .with_profiles(Arc::new(ProfileRegistry::new()));

        let outcomes = crawler.crawl_many(&urls, None).await;

        assert_eq!(
            outcomes.iter().map(|o| o.url.as_str()).collect::<Vec<_>>(),
            urls.iter().map(String::as_str).collect::<Vec<_>>()
        );
        outcomes.iter().for_each(assert_outcome_succeeded);
        assert_eq!(
            sleeper.durations(),
            vec![Duration::from_millis(3000), Duration::from_millis(3000)]
        );

        let timeline = fetcher.timeline();
        let at = |event: StubEvent| timeline.iter().position(|e| *e == event).unwrap();
        let started = |i: usize| at(StubEvent::Started(urls[i].clone()));
        let finished = |i: usize| at(StubEvent::Finished(urls[i].clone()));

        // Members of a group are in flight together.
        assert!(started(1) < finished(0));
        assert!(finished(1) < finished(0));
        assert!(started(3) < finished(2));
        // A group starts only once the previous one has fully finished.
        assert!(finished(0) < started(2));
        assert!(finished(1) < started(2));
        assert!(finished(2) < started(4));
        assert!(finished(3) < started(4));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let urls = ["https://ok.test/a", "not a url", "https://ok.test/b"];
        let fetcher = StubFetcher::new()
            .with_page(urls[0], fixtures::long_article_page(1))
            .with_page(urls[2], fixtures::long_article_page(1));
        let sleeper = Arc::new(RecordingSleeper::new());
        let crawler = PageCrawler::with_fetcher(Arc::new(fetcher), CrawlConfig::default())
            .with_sleeper(sleeper.clone());

        let outcomes = crawler
            .crawl_many_with(&urls, &crate::config::BatchConfig::new().with_max_concurrent(3), None)
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_outcome_succeeded(&outcomes[0]);
        assert_outcome_failed(&outcomes[1], "invalid_input");
        assert_outcome_succeeded(&outcomes[2]);
        assert!(sleeper.durations().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_outcome() {
        let urls = ["https://down.test/", "https://up.test/"];
        let fetcher = StubFetcher::new()
            .with_error(urls[0], FetchError::status(403))
            .with_page(urls[1], fixtures::long_article_page(1));
        let crawler = PageCrawler::with_fetcher(Arc::new(fetcher), CrawlConfig::default())
            .with_sleeper(Arc::new(RecordingSleeper::new()));

        let outcomes = crawler.crawl_many(&urls, None).await;

        assert_outcome_failed(&outcomes[0], "transport");
        assert!(outcomes[0].chunks().is_empty());
        assert_outcome_succeeded(&outcomes[1]);
        assert!(!outcomes[1].chunks().is_empty());
    }
}
