//! The ordered extraction strategies.
//!
//! Each strategy is a pure function of the parsed document and the page
//! context. A strategy either returns a candidate or an [`ExtractionMiss`];
//! length acceptance against the chain threshold happens in the caller.

use scraper::{ElementRef, Html};
use serde_json::{Map, Value};

use super::dom::{
    body, element_text, is_pruned, parse_group, parse_selector, parse_selectors, title_from,
};
use super::PageContext;
use crate::errors::ExtractionMiss;
use crate::models::{ExtractionCandidate, ExtractionMethod};
use crate::text::normalize;

/// Article-body containers tried by the semantic strategy, in order.
pub const SEMANTIC_SELECTORS: [&str; 13] = [
    "main article",
    r#"[role="main"] article"#,
    "main .content",
    "article .content",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".story-body",
    ".content-body",
    r#"[itemprop="articleBody"]"#,
    ".markdown-body",
    ".docs-content",
    ".wiki-content",
];

/// Page chrome removed by the generic strategy.
pub const CHROME_SELECTORS: [&str; 21] = [
    "script",
    "style",
    "nav",
    "footer",
    "header",
    ".navigation",
    ".sidebar",
    ".menu",
    ".ads",
    ".advertisement",
    "#comments",
    ".comment",
    ".social-share",
    ".cookie-notice",
    ".popup",
    ".modal",
    ".overlay",
    r#"[role="banner"]"#,
    r#"[role="navigation"]"#,
    ".related-posts",
    ".recommended",
];

/// Content containers read by the generic strategy, in order.
pub const GENERIC_CONTAINERS: [&str; 12] = [
    "main",
    "article",
    ".content",
    ".main-content",
    ".post-content",
    ".entry-content",
    "#content",
    ".article-body",
    ".story-body",
    ".post-body",
    r#"[role="main"]"#,
    ".page-content",
];

/// Types accepted as article structured data.
const ARTICLE_TYPES: [&str; 2] = ["Article", "NewsArticle"];

fn candidate(
    page: &PageContext<'_>,
    title: String,
    text: &str,
    method: ExtractionMethod,
) -> ExtractionCandidate {
    ExtractionCandidate {
        title,
        text: normalize(text),
        metadata: page.metadata.clone(),
        method,
    }
}

/// Profile-driven extraction.
///
/// Prunes `remove_selectors`, then joins the text of every element matching
/// the content selectors in document order. Matches nested inside an
/// earlier match are skipped so text is not repeated.
pub fn site_config(
    document: &Html,
    page: &PageContext<'_>,
) -> Result<ExtractionCandidate, ExtractionMiss> {
    let profile = page.profile;
    if profile.content_selectors.is_empty() {
        return Err(ExtractionMiss::NotConfigured);
    }
    let content = parse_group(&profile.content_selectors)?;
    let prune = parse_selectors(&profile.remove_selectors)?;

    let is_nested = |element: &ElementRef<'_>| {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| content.matches(&ancestor))
    };
    let is_removed = |element: &ElementRef<'_>| {
        is_pruned(element, &prune)
            || element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| is_pruned(&ancestor, &prune))
    };

    let parts: Vec<String> = document
        .select(&content)
        .filter(|el| !is_nested(el) && !is_removed(el))
        .map(|el| normalize(&element_text(el, &prune)))
        .filter(|text| !text.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(ExtractionMiss::NoMatch);
    }

    let title = if profile.title_selectors.is_empty() {
        None
    } else {
        title_from(document, &parse_group(&profile.title_selectors)?)
    };

    Ok(candidate(
        page,
        title.unwrap_or_else(|| page.title.clone()),
        &parts.join("\n\n"),
        ExtractionMethod::SiteConfig,
    ))
}

fn is_article_type(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(kind)) => ARTICLE_TYPES.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| ARTICLE_TYPES.contains(&kind)),
        _ => false,
    }
}

fn string_or_list(value: Option<&Value>, separator: &str) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

fn article_body(article: &Map<String, Value>) -> Option<String> {
    string_or_list(article.get("articleBody"), "\n\n")
        .or_else(|| string_or_list(article.get("text"), "\n\n"))
}

fn author_name(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(name) => Some(name.trim().to_string()).filter(|n| !n.is_empty()),
        Value::Object(author) => author_name(author.get("name")),
        Value::Array(authors) => {
            let names: Vec<String> = authors.iter().filter_map(|a| author_name(Some(a))).collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        _ => None,
    }
}

/// Finds the first article object with a body, searching arrays and `@graph`.
fn find_article(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Array(items) => items.iter().find_map(find_article),
        Value::Object(map) => {
            if is_article_type(map.get("@type")) && article_body(map).is_some() {
                return Some(map);
            }
            map.get("@graph").and_then(find_article)
        }
        _ => None,
    }
}

/// JSON-LD Article/NewsArticle extraction.
///
/// Blocks that fail to parse are skipped. Headline, author and dates from
/// the article override the page-level values.
pub fn structured_data(
    document: &Html,
    page: &PageContext<'_>,
) -> Result<ExtractionCandidate, ExtractionMiss> {
    let scripts = parse_selector(r#"script[type="application/ld+json"]"#)?;

    for script in document.select(&scripts) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(raw.trim()) else {
            tracing::debug!(url = page.url, "skipping malformed JSON-LD block");
            continue;
        };
        let Some(article) = find_article(&value) else {
            continue;
        };
        let Some(article_text) = article_body(article) else {
            continue;
        };

        let title = string_or_list(article.get("headline"), " ")
            .or_else(|| string_or_list(article.get("name"), " "))
            .unwrap_or_else(|| page.title.clone());
        let mut found = candidate(page, title, &article_text, ExtractionMethod::SchemaOrg);
        if let Some(author) = author_name(article.get("author")) {
            found.metadata.author = Some(author);
        }
        if let Some(published) = string_or_list(article.get("datePublished"), " ") {
            found.metadata.published_time = Some(published);
        }
        if let Some(modified) = string_or_list(article.get("dateModified"), " ") {
            found.metadata.modified_time = Some(modified);
        }
        return Ok(found);
    }

    Err(ExtractionMiss::NoStructuredData)
}

/// Semantic container extraction.
///
/// The first element of each selector is tried in order; it is accepted
/// when its normalized text exceeds `page.semantic_min_length`.
pub fn semantic(
    document: &Html,
    page: &PageContext<'_>,
) -> Result<ExtractionCandidate, ExtractionMiss> {
    let mut longest = 0;
    for selector in SEMANTIC_SELECTORS {
        let selector = parse_selector(selector)?;
        let Some(element) = document.select(&selector).next() else {
            continue;
        };
        let text = normalize(&element_text(element, &[]));
        let length = text.chars().count();
        if length > page.semantic_min_length {
            return Ok(candidate(page, page.title.clone(), &text, ExtractionMethod::Semantic));
        }
        longest = longest.max(length);
    }

    if longest == 0 {
        Err(ExtractionMiss::NoMatch)
    } else {
        Err(ExtractionMiss::TooShort {
            length: longest,
            required: page.semantic_min_length + 1,
        })
    }
}

/// Generic extraction with chrome removed.
///
/// Reads the first generic container present, or the whole body.
pub fn generic(
    document: &Html,
    page: &PageContext<'_>,
) -> Result<ExtractionCandidate, ExtractionMiss> {
    let prune = parse_selectors(&CHROME_SELECTORS)?;

    let mut container = None;
    for selector in GENERIC_CONTAINERS {
        let selector = parse_selector(selector)?;
        container = document
            .select(&selector)
            .find(|el| !is_pruned(el, &prune));
        if container.is_some() {
            break;
        }
    }

    let root = container.unwrap_or_else(|| body(document));
    let text = element_text(root, &prune);
    if text.trim().is_empty() {
        return Err(ExtractionMiss::NoMatch);
    }
    Ok(candidate(page, page.title.clone(), &text, ExtractionMethod::Generic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::dom::{page_metadata, page_title};
    use crate::profiles::SiteProfile;
    use pretty_assertions::assert_eq;

    fn context<'a>(document: &Html, profile: &'a SiteProfile) -> PageContext<'a> {
        PageContext {
            url: "https://site.test/post",
            profile,
            title: page_title(document),
            metadata: page_metadata(document, "https://site.test/post"),
            semantic_min_length: 200,
        }
    }

    #[test]
    fn test_site_config_prunes_and_skips_nested() {
        let doc = Html::parse_document(
            r#"<body>
                <div class="story"><p>Outer story text.</p>
                    <div class="story"><p>Inner story text.</p></div>
                    <div class="promo">Subscribe today</div>
                </div>
                <div class="story"><p>Second story.</p></div>
                <h2 class="headline">Profile headline</h2>
            </body>"#,
        );
        let profile = SiteProfile::new()
            .with_content_selectors([".story"])
            .with_title_selectors([".headline"])
            .with_remove_selectors([".promo"]);
        let page = context(&doc, &profile);

        let found = site_config(&doc, &page).unwrap();
        assert_eq!(found.title, "Profile headline");
        assert_eq!(
            found.text,
            "Outer story text.\n\nInner story text.\n\nSecond story."
        );
        assert_eq!(found.method, ExtractionMethod::SiteConfig);
    }

    #[test]
    fn test_site_config_requires_selectors() {
        let doc = Html::parse_document("<body><p>text</p></body>");
        let profile = SiteProfile::new();
        assert_eq!(
            site_config(&doc, &context(&doc, &profile)).unwrap_err(),
            ExtractionMiss::NotConfigured
        );
    }

    #[test]
    fn test_site_config_no_match() {
        let doc = Html::parse_document("<body><p>text</p></body>");
        let profile = SiteProfile::new().with_content_selectors([".missing"]);
        assert_eq!(
            site_config(&doc, &context(&doc, &profile)).unwrap_err(),
            ExtractionMiss::NoMatch
        );
    }

    #[test]
    fn test_structured_data_in_graph() {
        let doc = Html::parse_document(
            r#"<html><head><title>Page</title>
            <script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
                {"@type":"WebSite","name":"Site"},
                {"@type":["NewsArticle"],"headline":"Graph headline",
                 "articleBody":["Para one.","Para two."],
                 "author":[{"name":"Ana"},"Binh"],
                 "datePublished":"2024-01-02T03:04:05Z"}
            ]}
            </script></head><body></body></html>"#,
        );
        let profile = SiteProfile::new();
        let found = structured_data(&doc, &context(&doc, &profile)).unwrap();

        assert_eq!(found.title, "Graph headline");
        assert_eq!(found.text, "Para one.\n\nPara two.");
        assert_eq!(found.metadata.author.as_deref(), Some("Ana, Binh"));
        assert_eq!(found.metadata.published_time.as_deref(), Some("2024-01-02T03:04:05Z"));
        assert_eq!(found.method, ExtractionMethod::SchemaOrg);
    }

    #[test]
    fn test_structured_data_requires_article() {
        let doc = Html::parse_document(
            r#"<script type="application/ld+json">{"@type":"Product","text":"not an article"}</script>"#,
        );
        let profile = SiteProfile::new();
        assert_eq!(
            structured_data(&doc, &context(&doc, &profile)).unwrap_err(),
            ExtractionMiss::NoStructuredData
        );
    }

    #[test]
    fn test_semantic_threshold() {
        let long = "Semantic body sentence. ".repeat(12);
        let doc = Html::parse_document(&format!(
            r#"<body><div class="post-content">short</div><div class="entry-content">{long}</div></body>"#
        ));
        let profile = SiteProfile::new();
        let found = semantic(&doc, &context(&doc, &profile)).unwrap();
        assert_eq!(found.text, long.trim());

        let doc = Html::parse_document(r#"<body><div class="post-content">short</div></body>"#);
        assert_eq!(
            semantic(&doc, &context(&doc, &profile)).unwrap_err(),
            ExtractionMiss::TooShort {
                length: 5,
                required: 201
            }
        );
    }

    #[test]
    fn test_generic_strips_chrome() {
        let doc = Html::parse_document(
            r#"<body><header>Site header</header><nav>Menu</nav>
               <div id="content"><p>Body copy.</p><div class="social-share">Share</div></div>
               <footer>Footer</footer></body>"#,
        );
        let profile = SiteProfile::new();
        let found = generic(&doc, &context(&doc, &profile)).unwrap();
        assert_eq!(found.text, "Body copy.");
    }

    #[test]
    fn test_generic_falls_back_to_body() {
        let doc = Html::parse_document(
            "<body><nav>Menu</nav><p>Loose paragraph.</p><footer>Footer</footer></body>",
        );
        let profile = SiteProfile::new();
        let found = generic(&doc, &context(&doc, &profile)).unwrap();
        assert_eq!(found.text, "Loose paragraph.");
    }
}
