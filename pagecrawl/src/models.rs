//! Data models for extraction candidates and output records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CrawlError;

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    /// Profile selectors after pruning.
    SiteConfig,
    /// JSON-LD Article/NewsArticle data.
    SchemaOrg,
    /// Generic article-body containers.
    Semantic,
    /// Chrome stripping plus content containers.
    Generic,
    /// String literals recovered from inline scripts.
    ScriptExtraction,
    /// Whole-body text scrape.
    #[default]
    Fallback,
}

impl ExtractionMethod {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SiteConfig => "site-config",
            Self::SchemaOrg => "schema-org",
            Self::Semantic => "semantic",
            Self::Generic => "generic",
            Self::ScriptExtraction => "script-extraction",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata recovered from a page's head and structured data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Meta description.
    pub description: Option<String>,
    /// Meta keywords, as written.
    pub keywords: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Published timestamp, as written.
    pub published_time: Option<String>,
    /// Modified timestamp, as written.
    pub modified_time: Option<String>,
    /// Site name.
    pub site_name: Option<String>,
    /// Open Graph type.
    pub content_type: Option<String>,
    /// Representative image URL.
    pub image: Option<String>,
    /// Canonical URL.
    pub canonical_url: Option<String>,
    /// Document `lang` attribute.
    pub html_lang: Option<String>,
    /// Hostname of the page.
    pub domain: Option<String>,
}

impl PageMetadata {
    /// Creates metadata holding only the domain.
    #[must_use]
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }
}

/// Tentative result of one extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCandidate {
    /// Page title.
    pub title: String,
    /// Normalized text.
    pub text: String,
    /// Page metadata.
    pub metadata: PageMetadata,
    /// Strategy that produced it.
    pub method: ExtractionMethod,
}

impl ExtractionCandidate {
    /// Length of the text in characters.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Metadata attached to each output chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Meta description.
    pub description: Option<String>,
    /// Meta keywords.
    pub keywords: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Published timestamp.
    pub published_time: Option<String>,
    /// Modified timestamp.
    pub modified_time: Option<String>,
    /// Site name.
    pub site_name: Option<String>,
    /// Canonical URL.
    pub canonical_url: Option<String>,
    /// Detected language of this chunk.
    pub language: String,
    /// Hostname of the page.
    pub domain: String,
    /// Words in this chunk.
    pub word_count: usize,
    /// Strategy that produced the page text.
    pub extraction_method: ExtractionMethod,
}

/// One bounded segment of a page's text, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentChunk {
    /// Identifier derived from URL hash, generation time and index.
    pub id: String,
    /// URL the chunk was extracted from.
    pub source_url: String,
    /// Page title.
    pub title: String,
    /// Segment text.
    pub text: String,
    /// Chunk metadata.
    pub metadata: ChunkMetadata,
    /// When the chunk was generated.
    pub created_at: DateTime<Utc>,
    /// Position within the page, zero-based.
    pub chunk_index: usize,
    /// Number of chunks produced for the page.
    pub total_chunks: usize,
}

/// Outcome of crawling one URL inside a batch.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The URL as given.
    pub url: String,
    /// Chunks, or the typed failure for this URL.
    pub result: Result<Vec<ContentChunk>, CrawlError>,
}

impl CrawlOutcome {
    /// Whether the URL was crawled without error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The chunks, empty on failure.
    #[must_use]
    pub fn chunks(&self) -> &[ContentChunk] {
        self.result.as_deref().unwrap_or(&[])
    }

    /// Converts to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match &self.result {
            Ok(chunks) => serde_json::json!({
                "url": self.url,
                "success": true,
                "chunks": chunks,
            }),
            Err(err) => serde_json::json!({
                "url": self.url,
                "success": false,
                "error": err.to_dict(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;

    fn sample_chunk() -> ContentChunk {
        ContentChunk {
            id: "chunk_abc_1_0".to_string(),
            source_url: "https://example.com/a".to_string(),
            title: "Example".to_string(),
            text: "Some chunk text.".to_string(),
            metadata: ChunkMetadata {
                language: "en".to_string(),
                domain: "example.com".to_string(),
                word_count: 3,
                extraction_method: ExtractionMethod::Semantic,
                ..Default::default()
            },
            created_at: Utc::now(),
            chunk_index: 0,
            total_chunks: 1,
        }
    }

    #[test]
    fn test_method_wire_names() {
        assert_eq!(ExtractionMethod::SiteConfig.as_str(), "site-config");
        assert_eq!(
            serde_json::to_value(ExtractionMethod::ScriptExtraction).unwrap(),
            serde_json::json!("script-extraction")
        );
        assert_eq!(ExtractionMethod::SchemaOrg.to_string(), "schema-org");
    }

    #[test]
    fn test_chunk_serializes_camel_case() {
        let value = serde_json::to_value(sample_chunk()).unwrap();
        assert_eq!(value["sourceUrl"], "https://example.com/a");
        assert_eq!(value["chunkIndex"], 0);
        assert_eq!(value["totalChunks"], 1);
        assert_eq!(value["metadata"]["wordCount"], 3);
        assert_eq!(value["metadata"]["extractionMethod"], "semantic");
    }

    #[test]
    fn test_chunk_metadata_defaults_to_fallback_method() {
        let meta = ChunkMetadata::default();
        assert_eq!(meta.extraction_method, ExtractionMethod::Fallback);
        assert_eq!(ExtractionMethod::default().as_str(), "fallback");
        assert!(meta.domain.is_empty());
        assert_eq!(meta.word_count, 0);
    }

    #[test]
    fn test_outcome_json() {
        let ok = CrawlOutcome {
            url: "https://example.com/a".to_string(),
            result: Ok(vec![sample_chunk()]),
        };
        assert!(ok.is_success());
        assert_eq!(ok.chunks().len(), 1);
        assert_eq!(ok.to_json()["success"], true);

        let failed = CrawlOutcome {
            url: "https://example.com/b".to_string(),
            result: Err(CrawlError::Transport {
                url: "https://example.com/b".to_string(),
                source: FetchError::status(502),
            }),
        };
        assert!(!failed.is_success());
        assert!(failed.chunks().is_empty());
        assert_eq!(failed.to_json()["error"]["kind"], "transport");
    }
}
