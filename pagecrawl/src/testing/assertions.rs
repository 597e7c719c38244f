//! Test assertions for crawl outcomes and chunk sequences.

use crate::models::{ContentChunk, CrawlOutcome};

/// Asserts that the outcome succeeded.
pub fn assert_outcome_succeeded(outcome: &CrawlOutcome) {
    assert!(
        outcome.is_success(),
        "Expected success for {}, got: {:?}",
        outcome.url,
        outcome.result.as_ref().err()
    );
}

/// Asserts that the outcome failed with the given error kind.
pub fn assert_outcome_failed(outcome: &CrawlOutcome, kind: &str) {
    match &outcome.result {
        Ok(chunks) => panic!(
            "Expected {kind} failure for {}, got {} chunks",
            outcome.url,
            chunks.len()
        ),
        Err(err) => assert_eq!(
            err.kind(),
            kind,
            "Expected {kind} failure for {}, got {err}",
            outcome.url
        ),
    }
}

/// Asserts the positional and size invariants of one page's chunks.
///
/// Indices run `0..total_chunks` in order, every chunk reports the same
/// total, all share one id prefix and generation time, and no chunk
/// exceeds `max_size` characters unless it is a single sentence.
pub fn assert_chunk_invariants(chunks: &[ContentChunk], max_size: usize) {
    for (position, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, position, "chunk {} out of order", chunk.id);
        assert_eq!(
            chunk.total_chunks,
            chunks.len(),
            "chunk {} reports wrong total",
            chunk.id
        );
        assert!(
            chunk.id.ends_with(&format!("_{position}")),
            "chunk id {} does not end with its index",
            chunk.id
        );
        let length = chunk.text.chars().count();
        assert!(
            length <= max_size || crate::text::split_sentences(&chunk.text).len() == 1,
            "chunk {} has {length} chars over limit {max_size}",
            chunk.id
        );
    }

    if let Some(first) = chunks.first() {
        let prefix = first.id.rsplit_once('_').map(|(p, _)| p.to_string());
        for chunk in chunks {
            assert_eq!(chunk.created_at, first.created_at);
            assert_eq!(chunk.id.rsplit_once('_').map(|(p, _)| p.to_string()), prefix);
        }
    }
}
