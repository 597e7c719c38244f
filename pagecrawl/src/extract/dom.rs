//! Text and metadata helpers over a parsed document.

use scraper::{ElementRef, Html, Node, Selector};

use crate::errors::ExtractionMiss;
use crate::models::PageMetadata;

/// Title used when no candidate source yields one.
pub const UNTITLED: &str = "Untitled Page";

/// Titles at or above this many characters are rejected.
const MAX_TITLE_CHARS: usize = 200;

/// Elements whose text is never content.
const SKIPPED_TAGS: [&str; 6] = ["script", "style", "noscript", "template", "svg", "iframe"];

/// Elements that end a paragraph.
const PARAGRAPH_TAGS: [&str; 14] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "article", "section", "table",
    "ul", "ol",
];

/// Elements that end a line.
const LINE_TAGS: [&str; 13] = [
    "br", "div", "li", "tr", "dd", "dt", "figcaption", "main", "header", "footer", "aside", "nav",
    "form",
];

/// Parses a selector, reporting failures as a strategy miss.
pub fn parse_selector(selector: &str) -> Result<Selector, ExtractionMiss> {
    Selector::parse(selector).map_err(|e| ExtractionMiss::InvalidSelector(format!("{selector}: {e}")))
}

/// Parses every selector in `selectors`.
pub fn parse_selectors<S: AsRef<str>>(selectors: &[S]) -> Result<Vec<Selector>, ExtractionMiss> {
    selectors.iter().map(|s| parse_selector(s.as_ref())).collect()
}

/// Parses a comma-joined group so matches come back in document order.
pub fn parse_group<S: AsRef<str>>(selectors: &[S]) -> Result<Selector, ExtractionMiss> {
    let joined = selectors
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    parse_selector(&joined)
}

/// Whether `element` matches any of the pruning selectors.
pub fn is_pruned(element: &ElementRef<'_>, prune: &[Selector]) -> bool {
    prune.iter().any(|s| s.matches(element))
}

fn collect_text(element: ElementRef<'_>, prune: &[Selector], out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if SKIPPED_TAGS.contains(&name) || is_pruned(&child_element, prune) {
                continue;
            }
            let separator = if PARAGRAPH_TAGS.contains(&name) {
                "\n\n"
            } else if LINE_TAGS.contains(&name) {
                "\n"
            } else {
                ""
            };
            out.push_str(separator);
            collect_text(child_element, prune, out);
            out.push_str(separator);
        } else if let Node::Text(text) = child.value() {
            out.push_str(text);
        }
    }
}

/// Visible text under `element`, skipping scripts and pruned subtrees.
///
/// Block-level elements contribute line or paragraph breaks so the result
/// keeps enough structure for chunking. The text is not normalized.
#[must_use]
pub fn element_text(element: ElementRef<'_>, prune: &[Selector]) -> String {
    let mut out = String::new();
    collect_text(element, prune, &mut out);
    out
}

/// The document's `<body>`, or the root element for fragments.
#[must_use]
pub fn body(document: &Html) -> ElementRef<'_> {
    parse_selector("body")
        .ok()
        .and_then(|s| document.select(&s).next())
        .unwrap_or_else(|| document.root_element())
}

fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_element<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector).ok()?;
    document.select(&selector).next()
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    first_element(document, selector).map(|el| squash(&el.text().collect::<String>()))
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    first_element(document, selector)
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn acceptable_title(title: Option<String>) -> Option<String> {
    title.filter(|t| !t.is_empty() && t.chars().count() < MAX_TITLE_CHARS)
}

/// Resolves the page title.
///
/// Tries the first `h1`, `<title>`, `og:title`, `meta[name=title]` and
/// `[itemprop=headline]` in turn; the first non-empty value shorter than
/// 200 characters wins, else [`UNTITLED`].
#[must_use]
pub fn page_title(document: &Html) -> String {
    let sources: [&dyn Fn() -> Option<String>; 5] = [
        &|| first_text(document, "h1"),
        &|| first_text(document, "title"),
        &|| first_attr(document, r#"meta[property="og:title"]"#, "content"),
        &|| first_attr(document, r#"meta[name="title"]"#, "content"),
        &|| first_text(document, r#"[itemprop="headline"]"#),
    ];
    sources
        .iter()
        .find_map(|source| acceptable_title(source()))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Text of the first element matching `selector`, if it is a usable title.
#[must_use]
pub fn title_from(document: &Html, selector: &Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    acceptable_title(Some(squash(&element.text().collect::<String>())))
}

/// Looks up a meta value by name.
///
/// Tries `name=`, `property=`, `og:`, `twitter:` and `itemprop=` forms.
#[must_use]
pub fn meta(document: &Html, name: &str) -> Option<String> {
    let selectors = [
        format!(r#"meta[name="{name}"]"#),
        format!(r#"meta[property="{name}"]"#),
        format!(r#"meta[property="og:{name}"]"#),
        format!(r#"meta[name="twitter:{name}"]"#),
        format!(r#"meta[itemprop="{name}"]"#),
    ];
    selectors
        .iter()
        .find_map(|selector| first_attr(document, selector, "content"))
}

fn first_meta(document: &Html, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| meta(document, name))
}

/// Hostname of `url`, as written.
#[must_use]
pub fn hostname(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Collects head metadata for the page at `url`.
#[must_use]
pub fn page_metadata(document: &Html, url: &str) -> PageMetadata {
    PageMetadata {
        description: meta(document, "description"),
        keywords: meta(document, "keywords"),
        author: meta(document, "author"),
        published_time: first_meta(
            document,
            &["article:published_time", "published_time", "datePublished"],
        ),
        modified_time: first_meta(
            document,
            &["article:modified_time", "modified_time", "dateModified"],
        ),
        site_name: meta(document, "site_name"),
        content_type: meta(document, "type"),
        image: meta(document, "image"),
        canonical_url: Some(
            first_attr(document, r#"link[rel="canonical"]"#, "href")
                .unwrap_or_else(|| url.to_string()),
        ),
        html_lang: Some(
            document
                .root_element()
                .value()
                .attr("lang")
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or("unknown")
                .to_string(),
        ),
        domain: hostname(url),
    }
}
