//! HTML parser for extracting title, body text and links
//!
//! The document is walked once in document order. Along the way this module
//! collects:
//! - The first non-empty text inside a `<title>` element
//! - Body text fragments of at least 10 characters, capped at 500 characters
//! - Every `<a href>` resolved against the page URL, keeping http(s) only

use scraper::{Html, Node};
use url::Url;

/// Maximum number of characters of body text kept per page
pub const CONTENT_LIMIT: usize = 500;

/// Fragments shorter than this are treated as navigation noise
pub const MIN_FRAGMENT_CHARS: usize = 10;

/// Length of a title derived from content when the page has none
pub const FALLBACK_TITLE_CHARS: usize = 50;

/// Elements whose text is never page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A successfully crawled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub content: String,
    /// Absolute http(s) URLs in the order they appear on the page
    pub links: Vec<String>,
}

impl Page {
    /// Builds a page from parse output, deriving a title from the content
    /// when the document had none
    pub fn from_parsed(url: impl Into<String>, parsed: ParsedPage) -> Self {
        let title = parsed
            .title
            .unwrap_or_else(|| fallback_title(&parsed.content));

        Self {
            url: url.into(),
            title,
            content: parsed.content,
            links: parsed.links,
        }
    }
}

/// Extracted information from an HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The first non-empty `<title>` text, trimmed
    pub title: Option<String>,

    /// Accumulated body text, at most 500 characters
    pub content: String,

    /// All followable links found on the page
    pub links: Vec<String>,
}

/// Parses HTML content and extracts title, content and links
///
/// # Link Extraction Rules
///
/// Every `<a href>` is resolved against `base_url`. Results whose scheme is
/// not `http` or `https` (`mailto:`, `javascript:`, `tel:`...) are dropped,
/// as are hrefs that fail to resolve. A bad link never fails the page.
///
/// # Example
///
/// ```
/// use crawlstars::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let mut title: Option<String> = None;
    let mut content = ContentBuffer::default();
    let mut links = Vec::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Element(element) => {
                if element.name() == "a" {
                    if let Some(link) = element.attr("href").and_then(|h| resolve_link(h, base_url))
                    {
                        links.push(link);
                    }
                }
            }
            Node::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }

                let mut in_title = false;
                let mut in_body = false;
                let mut in_non_content = false;
                for ancestor in node.ancestors() {
                    if let Some(element) = ancestor.value().as_element() {
                        match element.name() {
                            "title" => in_title = true,
                            "body" => in_body = true,
                            name if NON_CONTENT_ELEMENTS.contains(&name) => in_non_content = true,
                            _ => {}
                        }
                    }
                }

                if in_title && title.is_none() {
                    title = Some(text.to_string());
                }

                if in_body && !in_non_content {
                    content.push_fragment(text);
                }
            }
            _ => {}
        }
    }

    ParsedPage {
        title,
        content: content.into_string(),
        links,
    }
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for unresolvable hrefs and non-HTTP(S) results.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let resolved = base_url.join(href.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// Derives a title from page content
///
/// Content of 50 characters or fewer is used unchanged; longer content is
/// cut to its first 50 characters followed by `...`.
pub fn fallback_title(content: &str) -> String {
    if content.chars().count() > FALLBACK_TITLE_CHARS {
        let mut title: String = content.chars().take(FALLBACK_TITLE_CHARS).collect();
        title.push_str("...");
        title
    } else {
        content.to_string()
    }
}

/// Accumulates body text up to the content limit
#[derive(Debug, Default)]
struct ContentBuffer {
    text: String,
    chars: usize,
}

impl ContentBuffer {
    fn push_fragment(&mut self, fragment: &str) {
        if self.chars >= CONTENT_LIMIT {
            return;
        }

        let len = fragment.chars().count();
        if len < MIN_FRAGMENT_CHARS {
            return;
        }

        let remaining = CONTENT_LIMIT - self.chars;
        if len >= remaining {
            self.text.extend(fragment.chars().take(remaining));
            self.chars = CONTENT_LIMIT;
        } else {
            self.text.push_str(fragment);
            self.text.push(' ');
            self.chars += len + 1;
        }
    }

    fn into_string(self) -> String {
        self.text
    }
}
