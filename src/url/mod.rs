//! URL handling module for Prospector
//!
//! This module provides start-URL parsing, link resolution and the same-site policy
//! used to keep a crawl on one origin.

mod scope;

pub use scope::SiteScope;

use ::url::Url;

/// Parses a user-supplied start URL
///
/// A missing scheme is treated as `https://`, so `example.com` works as input.
/// Only HTTP and HTTPS URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use prospector::url::parse_start_url;
///
/// let url = parse_start_url("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn parse_start_url(input: &str) -> Result<Url, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("URL is empty".to_string());
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let mut url = Url::parse(&candidate).map_err(|e| e.to_string())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "only HTTP and HTTPS are supported, got {}",
            url.scheme()
        ));
    }

    if url.host_str().is_none() {
        return Err("URL has no host".to_string());
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves an anchor `href` against the page it was found on
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// The fragment of the resolved URL is dropped.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base_url.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}
