//! Content extraction from raw HTML.
//!
//! Extraction runs an ordered chain of [`Strategy`] values over one parsed
//! document and accepts the first candidate whose text is longer than the
//! minimum content length. When every strategy misses, the page falls back
//! to inline-script strings or a whole-body scrape, so a fetched page
//! always yields a candidate.
//!
//! Parsing is synchronous; the parsed document never crosses an `.await`.

mod dom;
mod fallback;
mod strategies;

use scraper::Html;

use crate::config::CrawlConfig;
use crate::errors::ExtractionMiss;
use crate::models::{ExtractionCandidate, ExtractionMethod, PageMetadata};
use crate::profiles::SiteProfile;

pub use dom::{element_text, page_metadata, page_title, UNTITLED};
pub use fallback::{script_strings, SCRIPT_KEYS};
pub use strategies::{CHROME_SELECTORS, GENERIC_CONTAINERS, SEMANTIC_SELECTORS};

/// Per-page inputs shared by every strategy.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    /// Page URL.
    pub url: &'a str,
    /// Profile resolved for the page's host.
    pub profile: &'a SiteProfile,
    /// Title resolved from the unpruned document.
    pub title: String,
    /// Head metadata.
    pub metadata: PageMetadata,
    /// Length the semantic strategy must exceed.
    pub semantic_min_length: usize,
}

impl<'a> PageContext<'a> {
    /// Builds the context for `document`.
    #[must_use]
    pub fn new(
        document: &Html,
        url: &'a str,
        profile: &'a SiteProfile,
        semantic_min_length: usize,
    ) -> Self {
        Self {
            url,
            profile,
            title: page_title(document),
            metadata: page_metadata(document, url),
            semantic_min_length,
        }
    }
}

/// One extraction strategy in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Profile selectors.
    SiteConfig,
    /// JSON-LD article data.
    StructuredData,
    /// Generic article-body containers.
    Semantic,
    /// Chrome stripping plus content containers.
    Generic,
}

impl Strategy {
    /// The chain, in priority order.
    pub const CHAIN: [Self; 4] = [
        Self::SiteConfig,
        Self::StructuredData,
        Self::Semantic,
        Self::Generic,
    ];

    /// Method recorded on candidates from this strategy.
    #[must_use]
    pub fn method(self) -> ExtractionMethod {
        match self {
            Self::SiteConfig => ExtractionMethod::SiteConfig,
            Self::StructuredData => ExtractionMethod::SchemaOrg,
            Self::Semantic => ExtractionMethod::Semantic,
            Self::Generic => ExtractionMethod::Generic,
        }
    }

    /// Runs this strategy over `document`.
    pub fn extract(
        self,
        document: &Html,
        page: &PageContext<'_>,
    ) -> Result<ExtractionCandidate, ExtractionMiss> {
        match self {
            Self::SiteConfig => strategies::site_config(document, page),
            Self::StructuredData => strategies::structured_data(document, page),
            Self::Semantic => strategies::semantic(document, page),
            Self::Generic => strategies::generic(document, page),
        }
    }
}

/// Runs `chain` in order and returns the first candidate longer than
/// `min_length` characters.
pub fn run_chain(
    chain: &[Strategy],
    document: &Html,
    page: &PageContext<'_>,
    min_length: usize,
) -> Option<ExtractionCandidate> {
    for strategy in chain {
        let outcome = strategy.extract(document, page).and_then(|found| {
            let length = found.text_len();
            if length > min_length {
                Ok(found)
            } else {
                Err(ExtractionMiss::TooShort {
                    length,
                    required: min_length + 1,
                })
            }
        });
        match outcome {
            Ok(found) => return Some(found),
            Err(miss) => {
                tracing::debug!(
                    url = page.url,
                    method = %strategy.method(),
                    reason = %miss,
                    "strategy produced no candidate"
                );
            }
        }
    }
    None
}

/// Extracts the best candidate from a fetched page.
///
/// Never fails: an exhausted chain falls back to script strings (when
/// longer than the minimum content length) or the whole-body text.
#[must_use]
pub fn extract_page(
    html: &str,
    url: &str,
    profile: &SiteProfile,
    config: &CrawlConfig,
) -> ExtractionCandidate {
    let document = Html::parse_document(html);
    let page = PageContext::new(&document, url, profile, config.semantic_min_length);

    run_chain(&Strategy::CHAIN, &document, &page, config.min_content_length).unwrap_or_else(|| {
        tracing::debug!(url, "strategy chain exhausted, using fallback extraction");
        fallback::last_resort(&document, &page, config.min_content_length)
    })
}

/// Extraction for the degraded fetch path: script strings or body text.
#[must_use]
pub fn extract_fallback(html: &str, url: &str, config: &CrawlConfig) -> ExtractionCandidate {
    let document = Html::parse_document(html);
    let profile = SiteProfile::default();
    let page = PageContext::new(&document, url, &profile, config.semantic_min_length);
    fallback::last_resort(&document, &page, config.min_content_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://blog.test/post";

    #[test]
    fn test_site_config_wins_over_semantic() {
        let profile = SiteProfile::new().with_content_selectors([".site-body"]);
        let found = extract_page(
            fixtures::SITE_AND_SEMANTIC_PAGE,
            URL,
            &profile,
            &CrawlConfig::default(),
        );

        assert_eq!(found.method, ExtractionMethod::SiteConfig);
        assert!(found.text.starts_with("Profile selected copy"));
    }

    #[test]
    fn test_semantic_used_without_profile() {
        let found = extract_page(
            fixtures::SITE_AND_SEMANTIC_PAGE,
            URL,
            &SiteProfile::default(),
            &CrawlConfig::default(),
        );

        assert_eq!(found.method, ExtractionMethod::Semantic);
        assert!(found.text.starts_with("Semantic container copy"));
    }

    #[test]
    fn test_structured_data_beats_semantic() {
        let found = extract_page(
            fixtures::JSON_LD_PAGE,
            URL,
            &SiteProfile::default(),
            &CrawlConfig::default(),
        );

        assert_eq!(found.method, ExtractionMethod::SchemaOrg);
        assert_eq!(found.title, "Structured headline");
        assert_eq!(found.metadata.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_short_site_config_falls_through() {
        let profile = SiteProfile::new().with_content_selectors(["h1"]);
        let found = extract_page(
            fixtures::SITE_AND_SEMANTIC_PAGE,
            URL,
            &profile,
            &CrawlConfig::default(),
        );
        assert_eq!(found.method, ExtractionMethod::Semantic);
    }

    #[test]
    fn test_thin_page_uses_body_fallback() {
        let found = extract_page(
            fixtures::THIN_PAGE,
            URL,
            &SiteProfile::default(),
            &CrawlConfig::default(),
        );

        assert_eq!(found.method, ExtractionMethod::Fallback);
        assert!(found.text.contains("Just a little text."));
    }

    #[test]
    fn test_spa_shell_uses_script_strings() {
        let found = extract_page(
            fixtures::SPA_SHELL_PAGE,
            URL,
            &SiteProfile::default(),
            &CrawlConfig::default(),
        );

        assert_eq!(found.method, ExtractionMethod::ScriptExtraction);
        assert!(found.text.contains("rendered on the client"));
    }

    #[test]
    fn test_extract_fallback_ignores_chain() {
        let found = extract_fallback(fixtures::JSON_LD_PAGE, URL, &CrawlConfig::default());
        assert_eq!(found.method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_chain_order() {
        assert_eq!(
            Strategy::CHAIN.map(Strategy::method),
            [
                ExtractionMethod::SiteConfig,
                ExtractionMethod::SchemaOrg,
                ExtractionMethod::Semantic,
                ExtractionMethod::Generic,
            ]
        );
    }
}
