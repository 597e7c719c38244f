//! Whitespace and invisible-character normalization.

/// Zero-width and invisible formatting characters removed from text.
const INVISIBLE: [char; 7] = [
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // byte order mark
    '\u{00AD}', // soft hyphen
    '\u{180E}', // mongolian vowel separator
];

fn is_invisible(c: char) -> bool {
    INVISIBLE.contains(&c) || (c.is_control() && c != '\n' && !c.is_whitespace())
}

/// Normalizes extracted text.
///
/// Line structure is kept so paragraphs survive for chunking: each line
/// has its whitespace runs collapsed to one space and is trimmed, runs of
/// blank lines collapse to a single blank line, invisible characters are
/// stripped and the result is trimmed.
#[must_use]
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|c| !is_invisible(*c))
        .collect();

    let mut out = String::with_capacity(cleaned.len());
    let mut pending_blank = false;

    for line in cleaned.split('\n') {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        out.push_str(&collapsed);
        pending_blank = false;
    }

    out
}

/// Number of whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
