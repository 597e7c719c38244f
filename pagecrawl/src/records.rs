//! Turns a page's winning candidate into output chunks.

use chrono::{DateTime, Utc};

use crate::models::{ChunkMetadata, ContentChunk, ExtractionCandidate};
use crate::profiles::normalize_host;
use crate::text::{chunk_text, detect_language, normalize, word_count};
use crate::utils::{generate_chunk_id, normalize_timestamp};

/// Normalizes and chunks `candidate`, producing one record per segment.
///
/// Every chunk shares `generated_at`, which also feeds the chunk ids.
/// Word count and language are computed per segment. The chunk domain is
/// the page host without its `www.` prefix.
#[must_use]
pub fn assemble_chunks(
    url: &str,
    candidate: &ExtractionCandidate,
    chunk_size: usize,
    generated_at: DateTime<Utc>,
) -> Vec<ContentChunk> {
    let segments = chunk_text(&normalize(&candidate.text), chunk_size);
    let total_chunks = segments.len();
    let page = &candidate.metadata;
    let domain = page.domain.as_deref().map(normalize_host).unwrap_or_default();

    segments
        .into_iter()
        .enumerate()
        .map(|(chunk_index, text)| ContentChunk {
            id: generate_chunk_id(url, generated_at, chunk_index),
            source_url: url.to_string(),
            title: candidate.title.clone(),
            metadata: ChunkMetadata {
                description: page.description.clone(),
                keywords: page.keywords.clone(),
                author: page.author.clone(),
                published_time: page.published_time.as_deref().map(normalize_timestamp),
                modified_time: page.modified_time.as_deref().map(normalize_timestamp),
                site_name: page.site_name.clone(),
                canonical_url: page.canonical_url.clone(),
                language: detect_language(&text).to_string(),
                domain: domain.clone(),
                word_count: word_count(&text),
                extraction_method: candidate.method,
            },
            text,
            created_at: generated_at,
            chunk_index,
            total_chunks,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractionMethod, PageMetadata};
    use crate::testing::assert_chunk_invariants;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn candidate(text: &str) -> ExtractionCandidate {
        ExtractionCandidate {
            title: "Title".to_string(),
            text: text.to_string(),
            metadata: PageMetadata {
                published_time: Some("2024-03-01T08:00:00+07:00".to_string()),
                ..PageMetadata::for_domain("news.test")
            },
            method: ExtractionMethod::Semantic,
        }
    }

    #[test]
    fn test_chunks_carry_positions_and_metadata() {
        let text = "Một đoạn văn tiếng Việt ngắn gọn.\n\nA second paragraph in English.";
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let chunks = assemble_chunks("https://news.test/a", &candidate(text), 40, at);

        assert_eq!(chunks.len(), 2);
        assert_chunk_invariants(&chunks, 40);
        assert_eq!(chunks[0].metadata.language, "vi");
        assert_eq!(chunks[1].metadata.language, "en");
        assert_eq!(chunks[1].metadata.word_count, 5);
        assert_eq!(chunks[0].metadata.domain, "news.test");
        assert_eq!(
            chunks[0].metadata.published_time.as_deref(),
            Some("2024-03-01T01:00:00Z")
        );
        assert!(chunks[0].id.ends_with("_loyw3v28_0"));
        assert_eq!(chunks[1].created_at, at);
    }

    #[test]
    fn test_chunk_domain_drops_www_prefix() {
        let candidate = ExtractionCandidate {
            metadata: PageMetadata::for_domain("www.News.test"),
            ..candidate("A paragraph long enough to survive the noise filter.")
        };
        let chunks = assemble_chunks("https://www.news.test/a", &candidate, 1000, Utc::now());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.domain, "news.test");
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(assemble_chunks("https://news.test/a", &candidate("   "), 100, Utc::now()).is_empty());
    }
}
