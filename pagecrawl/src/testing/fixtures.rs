//! HTML fixtures for extraction and pipeline tests.

/// A page where both the profile selector and the semantic container hold
/// enough text to be accepted.
pub const SITE_AND_SEMANTIC_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Dual Content Page</title>
    <meta name="description" content="A page with two readable regions">
</head>
<body>
    <h1>Dual Content</h1>
    <div class="site-body">
        <p>Profile selected copy that the site configuration points at directly.
        It is long enough to clear the minimum content length on its own.</p>
    </div>
    <main>
        <article>
            <p>Semantic container copy lives inside the main article element.
            It repeats itself to be comfortably longer than two hundred characters.
            The semantic strategy would accept it if the profile had not matched.
            One more sentence keeps the length well above the threshold.</p>
        </article>
    </main>
</body>
</html>"#;

/// A page whose JSON-LD article should win over its semantic container.
pub const JSON_LD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Structured Page</title>
    <script type="application/ld+json">
    {
        "@context": "https://schema.org",
        "@type": "NewsArticle",
        "headline": "Structured headline",
        "author": {"@type": "Person", "name": "Jane Doe"},
        "datePublished": "2024-05-06T07:08:09Z",
        "articleBody": "Structured article body published as linked data. It carries the full story text so that crawlers do not need to interpret the visual layout of the page at all."
    }
    </script>
</head>
<body>
    <main>
        <article>
            <p>Visible article text that the semantic strategy could also read.
            It is deliberately long so that it would pass the semantic threshold of
            two hundred characters if the structured data were missing entirely.</p>
        </article>
    </main>
</body>
</html>"#;

/// A page with too little text for any strategy.
pub const THIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Thin</title></head>
<body><p>Just a little text.</p></body>
</html>"#;

/// A client-rendered shell with its content in an inline script.
pub const SPA_SHELL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>App</title></head>
<body>
    <div id="root"></div>
    <script>
        window.__INITIAL_STATE__ = {"page": {"content": "This article is rendered on the client from an embedded state object, so the server response only contains the text inside this script tag."}};
    </script>
</body>
</html>"#;

/// A long multi-paragraph article used for chunking tests.
#[must_use]
pub fn long_article_page(paragraphs: usize) -> String {
    let body: String = (1..=paragraphs)
        .map(|n| {
            format!(
                "<p>Paragraph {n} opens with a plain statement. It continues with a second \
                 sentence that adds detail! Does it end with a question? It ends calmly.</p>\n"
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Long Article</title>
    <meta property="article:published_time" content="2024-02-03T04:05:06+02:00">
</head>
<body>
    <nav>Home | About</nav>
    <article class="entry-content">
{body}    </article>
</body>
</html>"#
    )
}
