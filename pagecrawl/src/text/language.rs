//! Best-effort language tagging from script ranges.

/// Characters examined from the start of the text.
const SAMPLE_CHARS: usize = 100;

/// Tag returned when no script heuristic matches.
pub const DEFAULT_LANGUAGE: &str = "en";

const VIETNAMESE: &str = "àáạảãâầấậẩẫăằắặẳẵèéẹẻẽêềếệểễìíịỉĩòóọỏõôồốộổỗơờớợởỡùúụủũưừứựửữỳýỵỷỹđ";

fn is_vietnamese(c: char) -> bool {
    VIETNAMESE.contains(c)
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё')
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FAF}')
}

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30FF}')
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}')
}

/// Tags the language of a text from its first characters.
///
/// Checks Vietnamese diacritics, Cyrillic, CJK ideographs, kana and Hangul
/// in that order and returns the first match, else [`DEFAULT_LANGUAGE`].
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    let sample: Vec<char> = text
        .chars()
        .take(SAMPLE_CHARS)
        .flat_map(char::to_lowercase)
        .collect();

    let checks: [(fn(char) -> bool, &'static str); 5] = [
        (is_vietnamese, "vi"),
        (is_cyrillic, "ru"),
        (is_cjk_ideograph, "zh"),
        (is_kana, "ja"),
        (is_hangul, "ko"),
    ];

    checks
        .iter()
        .find(|(matches, _)| sample.iter().any(|c| matches(*c)))
        .map_or(DEFAULT_LANGUAGE, |&(_, tag)| tag)
}
