//! Same-site link discovery
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` anywhere in the document, resolved against the page URL
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - `javascript:`, `mailto:`, `tel:` links and data URIs
//! - Fragment-only links
//! - Anything whose origin differs from the crawl's start URL

use crate::url::{resolve_link, SiteScope};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Discovers in-scope links in an HTML page
///
/// The result behaves as a set: each URL appears once, in the order it was first seen.
/// Fragments are stripped, so `/about` and `/about#team` collapse to one entry.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the page was served from, for resolving relative links
/// * `scope` - The start URL's origin; other origins are dropped
///
/// # Example
///
/// ```
/// use prospector::crawler::discover_links;
/// use prospector::url::SiteScope;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/menu").unwrap();
/// let scope = SiteScope::new(&base);
/// let html = r#"<a href="/about">About</a><a href="https://other.com/">Other</a>"#;
/// let links = discover_links(html, &base, &scope);
/// assert_eq!(links, vec![Url::parse("https://example.com/about").unwrap()]);
/// ```
pub fn discover_links(html: &str, base_url: &Url, scope: &SiteScope) -> Vec<Url> {
    let document = Html::parse_document(html);
    discover_links_in(&document, base_url, scope)
}

fn discover_links_in(document: &Html, base_url: &Url, scope: &SiteScope) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_link(href, base_url) else {
            continue;
        };

        if !scope.contains(&resolved) {
            tracing::trace!("Skipping off-site link {}", resolved);
            continue;
        }

        if seen.insert(resolved.as_str().to_string()) {
            links.push(resolved);
        }
    }

    links
}
