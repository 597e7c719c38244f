//! Text normalization, chunking and language tagging.

mod chunker;
mod language;
mod normalize;

pub use chunker::{chunk_text, split_sentences, MIN_CHUNK_CHARS};
pub use language::{detect_language, DEFAULT_LANGUAGE};
pub use normalize::{normalize, word_count};
