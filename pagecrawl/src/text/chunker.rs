//! Splits normalized text into bounded segments.
//!
//! Paragraphs (blank-line separated) are packed greedily into segments of at
//! most `max_size` characters. A paragraph that alone exceeds the limit is
//! broken into sentences which are packed the same way. A sentence longer
//! than the limit is emitted whole as one oversized segment.

use regex::Regex;
use std::sync::LazyLock;

/// Segments shorter than this many characters are discarded as noise.
pub const MIN_CHUNK_CHARS: usize = 10;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid paragraph regex"));

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Splits a paragraph into sentences.
///
/// A boundary follows a run of `.`, `!` or `?` that is followed by
/// whitespace or the end of input. Text after the last terminator forms its
/// own sentence, so no characters are dropped.
#[must_use]
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if matches!(next, '.' | '!' | '?') {
                end = next_idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            let sentence = paragraph[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Accumulates units into segments under the size limit.
struct SegmentBuilder {
    max_size: usize,
    current: String,
    current_len: usize,
    segments: Vec<String>,
}

impl SegmentBuilder {
    fn new(max_size: usize) -> Self {
        Self {
            max_size,
            current: String::new(),
            current_len: 0,
            segments: Vec::new(),
        }
    }

    fn push(&mut self, unit: &str, separator: &str) {
        let unit_len = char_len(unit);
        if self.current_len > 0
            && self.current_len + char_len(separator) + unit_len > self.max_size
        {
            self.flush();
        }
        if self.current_len > 0 {
            self.current.push_str(separator);
            self.current_len += char_len(separator);
        }
        self.current.push_str(unit);
        self.current_len += unit_len;
    }

    fn flush(&mut self) {
        let segment = std::mem::take(&mut self.current);
        self.current_len = 0;
        let segment = segment.trim();
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.segments
    }
}

/// Splits text into ordered segments of at most `max_size` characters.
///
/// Empty input or a zero `max_size` yields nothing. Input that fits yields
/// exactly one segment equal to the trimmed input. Segments shorter than
/// [`MIN_CHUNK_CHARS`] are dropped.
#[must_use]
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() || max_size == 0 {
        return Vec::new();
    }

    let segments = if char_len(text) <= max_size {
        vec![text.to_string()]
    } else {
        let mut builder = SegmentBuilder::new(max_size);
        for paragraph in PARAGRAPH_BREAK.split(text) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if char_len(paragraph) > max_size {
                builder.flush();
                for sentence in split_sentences(paragraph) {
                    builder.push(sentence, " ");
                }
            } else {
                builder.push(paragraph, "\n\n");
            }
        }
        builder.finish()
    };

    segments
        .into_iter()
        .filter(|s| char_len(s) >= MIN_CHUNK_CHARS)
        .collect()
}
