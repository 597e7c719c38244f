//! Last-resort extraction for pages the strategy chain cannot read.

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

use super::dom::{body, element_text, parse_selector};
use super::PageContext;
use crate::models::{ExtractionCandidate, ExtractionMethod};
use crate::text::normalize;

/// Keys whose string values are recovered from inline scripts, in order.
pub const SCRIPT_KEYS: [&str; 4] = ["text", "content", "body", "description"];

static SCRIPT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(text|content|body|description)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("valid script string regex")
});

fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\""))
        .unwrap_or_else(|_| raw.replace("\\n", "\n").replace("\\\"", "\""))
}

/// Recovers `"key": "value"` string literals from inline scripts.
///
/// All values for `text` come first, then `content`, `body` and
/// `description`, each in document order. Values are JSON-unescaped and
/// joined with spaces.
#[must_use]
pub fn script_strings(document: &Html) -> String {
    let Ok(scripts) = parse_selector("script:not([src])") else {
        return String::new();
    };

    let mut buckets: [Vec<String>; SCRIPT_KEYS.len()] = Default::default();
    for script in document.select(&scripts) {
        let source = script.text().collect::<String>();
        for captures in SCRIPT_STRING.captures_iter(&source) {
            let key = &captures[1];
            let value = unescape(&captures[2]);
            if value.trim().is_empty() {
                continue;
            }
            if let Some(slot) = SCRIPT_KEYS.iter().position(|k| *k == key) {
                buckets[slot].push(value);
            }
        }
    }

    buckets
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-body text with scripts and styles skipped.
#[must_use]
pub fn body_scrape(document: &Html, page: &PageContext<'_>) -> ExtractionCandidate {
    ExtractionCandidate {
        title: page.title.clone(),
        text: normalize(&element_text(body(document), &[])),
        metadata: page.metadata.clone(),
        method: ExtractionMethod::Fallback,
    }
}

/// Script strings when they exceed `min_length`, else the body scrape.
#[must_use]
pub fn last_resort(
    document: &Html,
    page: &PageContext<'_>,
    min_length: usize,
) -> ExtractionCandidate {
    let scripted = normalize(&script_strings(document));
    if scripted.chars().count() > min_length {
        return ExtractionCandidate {
            title: page.title.clone(),
            text: scripted,
            metadata: page.metadata.clone(),
            method: ExtractionMethod::ScriptExtraction,
        };
    }
    body_scrape(document, page)
}
