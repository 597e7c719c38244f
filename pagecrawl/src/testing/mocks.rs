//! Scripted network and clock doubles.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use crate::errors::FetchError;
use crate::fetch::{FetchedPage, Fetcher, Sleeper};

/// A recorded call to [`StubFetcher::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct StubCall {
    /// Requested URL.
    pub url: String,
    /// Headers sent with the request.
    pub headers: BTreeMap<String, String>,
    /// Timeout requested by the caller.
    pub timeout: Option<Duration>,
}

/// A point in a [`StubFetcher`]'s activity, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubEvent {
    /// A fetch for the URL was issued.
    Started(String),
    /// The fetch for the URL returned, after any scripted delay.
    Finished(String),
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<String, FetchError>>,
    delay: Duration,
}

impl Script {
    /// Pops the next scripted response; the last one repeats forever.
    fn next(&mut self) -> Option<Result<String, FetchError>> {
        if self.responses.len() > 1 {
            self.responses.pop_front()
        } else {
            self.responses.front().cloned()
        }
    }
}

/// A fetcher that replays scripted responses per URL and records calls.
///
/// Unscripted URLs fail with a 404 status.
#[derive(Debug, Default)]
pub struct StubFetcher {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<StubCall>>,
    timeline: Mutex<Vec<StubEvent>>,
}

impl StubFetcher {
    /// Creates an empty stub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a response to the script for `url`.
    #[must_use]
    pub fn with_response(self, url: &str, response: Result<String, FetchError>) -> Self {
        self.scripts
            .lock()
            .entry(url.to_string())
            .or_default()
            .responses
            .push_back(response);
        self
    }

    /// Appends a successful HTML body.
    #[must_use]
    pub fn with_page(self, url: &str, body: impl Into<String>) -> Self {
        self.with_response(url, Ok(body.into()))
    }

    /// Appends a failure.
    #[must_use]
    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        self.with_response(url, Err(error))
    }

    /// Delays every response for `url`.
    #[must_use]
    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.scripts.lock().entry(url.to_string()).or_default().delay = delay;
        self
    }

    /// Returns all recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().clone()
    }

    /// Returns start and finish events across all URLs, in order.
    #[must_use]
    pub fn timeline(&self) -> Vec<StubEvent> {
        self.timeline.lock().clone()
    }

    /// Returns the number of calls made for `url`.
    #[must_use]
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.url == url).count()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<FetchedPage, FetchError> {
        self.calls.lock().push(StubCall {
            url: url.to_string(),
            headers: headers.clone(),
            timeout,
        });
        self.timeline.lock().push(StubEvent::Started(url.to_string()));

        let (response, delay) = {
            let mut scripts = self.scripts.lock();
            match scripts.get_mut(url) {
                Some(script) => (script.next(), script.delay),
                None => (None, Duration::ZERO),
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.timeline.lock().push(StubEvent::Finished(url.to_string()));

        match response {
            Some(Ok(body)) => Ok(FetchedPage::html(url, body)),
            Some(Err(error)) => Err(error),
            None => Err(FetchError::status(404)),
        }
    }
}

/// A sleeper that records requested durations and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    durations: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Creates a new recording sleeper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every requested duration in order.
    #[must_use]
    pub fn durations(&self) -> Vec<Duration> {
        self.durations.lock().clone()
    }

    /// Sum of all requested durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.durations.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.durations.lock().push(duration);
    }
}
