//! Per-domain extraction hints and the registry that resolves them.
//!
//! Profiles are immutable values shared behind `Arc`. A crawl resolves its
//! profile once, so registering or replacing a profile while crawls are in
//! flight only affects crawls that start afterwards.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Extraction hints for one domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteProfile {
    /// Selectors locating the main content, in priority order.
    #[serde(default)]
    pub content_selectors: Vec<String>,
    /// Selectors locating the title, in priority order.
    #[serde(default)]
    pub title_selectors: Vec<String>,
    /// Selectors for elements stripped before extraction.
    #[serde(default)]
    pub remove_selectors: Vec<String>,
    /// Delay before fetching, approximating client-side settling.
    #[serde(default)]
    pub pre_fetch_wait_ms: u64,
    /// User agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Referer header override.
    #[serde(default)]
    pub referer: Option<String>,
    /// Additional header overrides.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl SiteProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content selectors.
    #[must_use]
    pub fn with_content_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the title selectors.
    #[must_use]
    pub fn with_title_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the remove selectors.
    #[must_use]
    pub fn with_remove_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remove_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the pre-fetch wait.
    #[must_use]
    pub fn with_pre_fetch_wait_ms(mut self, wait_ms: u64) -> Self {
        self.pre_fetch_wait_ms = wait_ms;
        self
    }

    /// Sets the user agent override.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the referer override.
    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Adds a header override.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets the pre-fetch wait as Duration.
    #[must_use]
    pub fn pre_fetch_wait(&self) -> Duration {
        Duration::from_millis(self.pre_fetch_wait_ms)
    }

    /// Whether the profile carries no hints at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Lowercases a hostname and strips a leading `www.`.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Table of site profiles keyed by normalized hostname.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: RwLock<HashMap<String, Arc<SiteProfile>>>,
    fallback: Arc<SiteProfile>,
}

impl ProfileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in profiles.
    #[must_use]
    pub fn builtin() -> Self {
        let registry = Self::new();
        for (domain, profile) in builtin_profiles() {
            registry.add(domain, profile);
        }
        registry
    }

    /// Parses a `{domain: profile}` JSON object and registers every entry.
    ///
    /// Returns the number of profiles registered.
    pub fn load_json(&self, json: &str) -> Result<usize, serde_json::Error> {
        let parsed: BTreeMap<String, SiteProfile> = serde_json::from_str(json)?;
        let count = parsed.len();
        for (domain, profile) in parsed {
            self.add(&domain, profile);
        }
        Ok(count)
    }

    /// Registers a profile, returning the one it replaced.
    pub fn add(&self, domain: &str, profile: SiteProfile) -> Option<Arc<SiteProfile>> {
        let key = normalize_host(domain);
        tracing::debug!(domain = %key, "Registering site profile");
        self.profiles.write().insert(key, Arc::new(profile))
    }

    /// Gets the profile registered for a domain.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<Arc<SiteProfile>> {
        self.profiles.read().get(&normalize_host(domain)).cloned()
    }

    /// Resolves the profile for a host, or the empty profile on a miss.
    #[must_use]
    pub fn resolve(&self, host: &str) -> Arc<SiteProfile> {
        self.get(host).unwrap_or_else(|| self.fallback.clone())
    }

    /// Lists every registered domain, sorted.
    #[must_use]
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.profiles.read().keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Whether no profiles are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

fn selectors(list: &str) -> Vec<String> {
    list.split(", ").map(str::to_string).collect()
}

fn browser_profile(wait_ms: u64, content: &str, title: &str, remove: &str) -> SiteProfile {
    SiteProfile::new()
        .with_pre_fetch_wait_ms(wait_ms)
        .with_content_selectors(selectors(content))
        .with_title_selectors(selectors(title))
        .with_remove_selectors(selectors(remove))
}

/// The profiles shipped with the crate.
#[must_use]
pub fn builtin_profiles() -> Vec<(&'static str, SiteProfile)> {
    use crate::config::DEFAULT_USER_AGENT as UA;

    let twitter = browser_profile(
        2000,
        "[data-testid=\"tweet\"], article[role=\"article\"]",
        "[data-testid=\"tweetText\"] span, .tweet-text",
        ".r-1loqt21, .r-u8s1d, [data-testid=\"placementTracking\"]",
    )
    .with_user_agent(UA)
    .with_header("X-Requested-With", "XMLHttpRequest");

    vec![
        (
            "facebook.com",
            browser_profile(
                3000,
                "[data-pagelet=\"FeedUnit\"], [role=\"article\"], .userContentWrapper",
                "[data-testid=\"post_message\"], h1, .actorName",
                ".uiPopover, .ego_section, ._4-u2, ._1dwg, ._5pcr",
            )
            .with_user_agent(UA)
            .with_header(
                "Sec-CH-UA",
                "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
            ),
        ),
        ("twitter.com", twitter.clone()),
        ("x.com", twitter),
        (
            "shopee.vn",
            browser_profile(
                3000,
                ".item-description, .product-detail, .shopee-item-info",
                ".item-name, .product-title, h1",
                ".shopee-mini-cart, .shopee-drawer, .fixed-plugin",
            )
            .with_user_agent(UA)
            .with_referer("https://shopee.vn/"),
        ),
        (
            "lazada.vn",
            browser_profile(
                2500,
                ".product-detail, .detail-content, .pdp-product-detail",
                ".product-title, h1",
                ".lzd-header, .lzd-footer, .float-module",
            )
            .with_user_agent(UA)
            .with_referer("https://www.lazada.vn/"),
        ),
        (
            "vnexpress.net",
            browser_profile(
                1500,
                ".fck_detail, .Normal, article, .content_detail",
                "h1.title_news, h1, .title-detail",
                ".box_category, .width_common, .banner",
            ),
        ),
        (
            "baomoi.com",
            browser_profile(
                2000,
                ".article-content, .bm_F, .detail-content",
                "h1, .article-title",
                ".header, .footer, .ads, .related",
            ),
        ),
        (
            "tinhte.vn",
            browser_profile(
                2000,
                ".bbWrapper, .message-content, article",
                "h1, .p-title",
                ".message-signature, .bbCodeBlock-expandLink",
            ),
        ),
        (
            "platform.openai.com",
            browser_profile(
                2000,
                ".docs-content, main, article, .markdown-body",
                "h1, .docs-title, .page-title",
                ".sidebar, .navigation, .docs-nav",
            ),
        ),
        (
            "github.com",
            browser_profile(
                1500,
                ".markdown-body, .repository-content, .readme",
                "h1, .entry-title, .f4",
                ".Header, .footer, .js-sticky",
            )
            .with_user_agent(UA)
            .with_header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        ),
        (
            "stackoverflow.com",
            browser_profile(
                1000,
                ".s-prose, .post-text, .answer",
                "h1, .question-hyperlink",
                ".left-sidebar, .right-sidebar, .js-vote-count",
            )
            .with_user_agent(UA),
        ),
    ]
}
