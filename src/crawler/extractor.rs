//! Readable-text extraction from HTML
//!
//! Boilerplate subtrees (scripts, styles, navigation chrome, cookie banners, ad
//! containers) are dropped, and what remains is linearized into plain text: one
//! trimmed line per line of each text node, in document order. Input that does not
//! open with markup is treated as text that was already extracted.

use crate::crawler::PageMetadata;
use crate::{ConfigError, ParseError};
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Text, title and metadata pulled out of one HTML document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    /// The page title (from the `<title>` tag)
    pub title: Option<String>,

    /// Readable text, text nodes joined with `\n`
    pub text: String,

    /// `<meta name="description">` content
    pub description: Option<String>,

    /// `<meta name="keywords">` content
    pub keywords: Option<String>,
}

impl ExtractedContent {
    /// Builds page metadata from the extracted meta tags plus response details
    pub fn metadata(
        &self,
        status: u16,
        headers: std::collections::BTreeMap<String, String>,
    ) -> PageMetadata {
        PageMetadata {
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            status,
            headers,
        }
    }
}

/// Extracts readable content using a configurable exclusion set
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    excluded: Vec<Selector>,
    title: Selector,
    description: Selector,
    keywords: Selector,
}

impl ContentExtractor {
    /// Compiles the exclusion selectors
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` if any selector does not parse.
    pub fn new<S: AsRef<str>>(excluded_selectors: &[S]) -> Result<Self, ConfigError> {
        let excluded = excluded_selectors
            .iter()
            .map(|s| parse_selector(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            excluded,
            title: parse_selector("title")?,
            description: parse_selector(r#"meta[name="description"]"#)?,
            keywords: parse_selector(r#"meta[name="keywords"]"#)?,
        })
    }

    /// Extracts title, text and metadata from an HTML document
    ///
    /// Parsing is best-effort: malformed markup is repaired by the HTML5 parser.
    /// A parse that panics is reported as `ParseError` so the caller can substitute
    /// empty content instead of failing the crawl.
    ///
    /// # Example
    ///
    /// ```
    /// use prospector::crawler::ContentExtractor;
    ///
    /// let extractor = ContentExtractor::new(&["script", "nav"]).unwrap();
    /// let html = r#"<html><head><title>Acme</title></head>
    ///     <body><nav>Menu</nav><h1>Welcome</h1><script>var x;</script><p>We make anvils.</p></body></html>"#;
    /// let content = extractor.extract(html).unwrap();
    /// assert_eq!(content.title.as_deref(), Some("Acme"));
    /// assert_eq!(content.text, "Acme\nWelcome\nWe make anvils.");
    /// ```
    pub fn extract(&self, html: &str) -> Result<ExtractedContent, ParseError> {
        catch_unwind(AssertUnwindSafe(|| self.extract_unchecked(html))).map_err(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "parser panicked".to_string());
            ParseError(message)
        })
    }

    fn extract_unchecked(&self, html: &str) -> ExtractedContent {
        if !looks_like_markup(html) {
            let mut lines = Vec::new();
            push_lines(&mut lines, html);
            return ExtractedContent {
                text: lines.join("\n"),
                ..ExtractedContent::default()
            };
        }

        let document = Html::parse_document(html);

        let title = document
            .select(&self.title)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());

        let description = meta_content(&document, &self.description);
        let keywords = meta_content(&document, &self.keywords);

        let excluded: HashSet<_> = self
            .excluded
            .iter()
            .flat_map(|selector| document.select(selector).map(|element| element.id()))
            .collect();

        // Iterative walk; deeply nested markup must not overflow the stack.
        let mut lines = Vec::new();
        let mut stack = vec![document.tree.root()];
        while let Some(node) = stack.pop() {
            if excluded.contains(&node.id()) {
                continue;
            }

            if let Node::Text(text) = node.value() {
                push_lines(&mut lines, text);
            }

            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }

        ExtractedContent {
            title,
            text: lines.join("\n"),
            description,
            keywords,
        }
    }
}

/// True when the input opens with a tag, comment or doctype
///
/// Extracted text is plain text even when it quotes markup (`&lt;b&gt;` decodes to `<b>`),
/// so only a leading tag marks a document. Feeding extracted text back in therefore
/// returns it unchanged.
fn looks_like_markup(input: &str) -> bool {
    let mut chars = input
        .trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '!' || c == '?')
}

/// Appends each trimmed, non-empty line of `text`
fn push_lines(lines: &mut Vec<String>, text: &str) {
    lines.extend(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Content of the first meta tag matching the selector; absent tag or attribute is None
fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.to_string())
}
