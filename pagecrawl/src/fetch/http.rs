//! reqwest-backed fetcher and request header assembly.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::{FetchedPage, Fetcher};
use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::profiles::SiteProfile;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 10;

/// Builds the headers for a primary fetch.
///
/// Base headers come first, profile overrides replace them, and the
/// profile's user agent wins over the configured default.
#[must_use]
pub fn build_headers(config: &FetchConfig, profile: &SiteProfile) -> BTreeMap<String, String> {
    let mut headers = config.headers.clone();
    headers.extend(profile.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
    if let Some(referer) = &profile.referer {
        headers.insert("Referer".to_string(), referer.clone());
    }
    let user_agent = profile.user_agent.as_ref().unwrap_or(&config.user_agent);
    headers.insert("User-Agent".to_string(), user_agent.clone());
    headers
}

/// Builds the minimal headers for the degraded fallback fetch.
#[must_use]
pub fn build_fallback_headers(config: &FetchConfig) -> BTreeMap<String, String> {
    BTreeMap::from([("User-Agent".to_string(), config.fallback_user_agent.clone())])
}

fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, FetchError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Fetcher using a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_response_size: usize,
}

impl HttpFetcher {
    /// Creates a fetcher from the fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            max_response_size: config.max_response_size,
        })
    }

    fn check_size(&self, size: usize) -> Result<(), FetchError> {
        if size > self.max_response_size {
            return Err(FetchError::TooLarge {
                size,
                limit: self.max_response_size,
            });
        }
        Ok(())
    }
}

fn map_error(err: reqwest::Error, timeout: Option<Duration>) -> FetchError {
    match timeout {
        Some(limit) if err.is_timeout() => FetchError::Timeout(limit),
        _ => FetchError::from(err),
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<FetchedPage, FetchError> {
        let started = Instant::now();
        let mut request = self.client.get(url).headers(to_header_map(headers)?);
        if let Some(limit) = timeout {
            request = request.timeout(limit);
        }

        let response = request.send().await.map_err(|e| map_error(e, timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }
        if let Some(length) = response.content_length() {
            self.check_size(usize::try_from(length).unwrap_or(usize::MAX))?;
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await.map_err(|e| map_error(e, timeout))?;
        self.check_size(body.len())?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
            final_url,
            content_type,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_USER_AGENT, FALLBACK_USER_AGENT};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_headers_defaults() {
        let headers = build_headers(&FetchConfig::default(), &SiteProfile::default());
        assert_eq!(headers.get("User-Agent").map(String::as_str), Some(DEFAULT_USER_AGENT));
        assert_eq!(headers.get("Sec-Fetch-Mode").map(String::as_str), Some("navigate"));
        assert!(!headers.contains_key("Referer"));
    }

    #[test]
    fn test_build_headers_profile_overrides() {
        let profile = SiteProfile::new()
            .with_user_agent("site-agent")
            .with_referer("https://shop.test/")
            .with_header("Accept", "text/html");
        let headers = build_headers(&FetchConfig::default(), &profile);

        assert_eq!(headers.get("User-Agent").map(String::as_str), Some("site-agent"));
        assert_eq!(headers.get("Referer").map(String::as_str), Some("https://shop.test/"));
        assert_eq!(headers.get("Accept").map(String::as_str), Some("text/html"));
        assert_eq!(
            headers.get("Accept-Language").map(String::as_str),
            Some("en-US,en;q=0.9,vi;q=0.8")
        );
    }

    #[test]
    fn test_fallback_headers_only_user_agent() {
        let headers = build_fallback_headers(&FetchConfig::default());
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("User-Agent").map(String::as_str), Some(FALLBACK_USER_AGENT));
    }

    #[test]
    fn test_header_map_rejects_invalid_value() {
        let headers = BTreeMap::from([("X-Bad".to_string(), "line\nbreak".to_string())]);
        let err = to_header_map(&headers).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { ref name, .. } if name == "X-Bad"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_size_limit() {
        let fetcher = HttpFetcher::new(&FetchConfig {
            max_response_size: 10,
            ..FetchConfig::default()
        })
        .unwrap();
        assert!(fetcher.check_size(10).is_ok());
        assert_eq!(
            fetcher.check_size(11),
            Err(FetchError::TooLarge { size: 11, limit: 10 })
        );
    }
}
