//! Web search for open-world research
//!
//! The crawler only sees one site; search lets the report agent pull in news,
//! competitors and market context. The provider sits behind [`WebSearcher`] so tests
//! and other backends can stand in for Exa.

mod exa;

pub use exa::ExaSearcher;

use crate::report::truncate_chars;
use crate::SearchError;
use async_trait::async_trait;
use serde::Serialize;

/// Characters of result text shown to the agent per hit
const RESULT_TEXT_CHARS: usize = 1000;

/// One hit from a web search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub url: String,
    pub title: Option<String>,
    /// Page text returned by the provider, if requested
    pub text: Option<String>,
    pub published_date: Option<String>,
}

/// Web search provider
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Searches the web, returning at most `num_results` hits
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Renders search hits as plain text for the agent
pub fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{}'", query);
    }

    let mut out = format!("Search results for '{}':\n", query);
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "\n[{}] {}\nURL: {}\n",
            i + 1,
            result.title.as_deref().unwrap_or("(untitled)"),
            result.url
        ));
        if let Some(date) = &result.published_date {
            out.push_str(&format!("Published: {}\n", date));
        }
        if let Some(text) = &result.text {
            out.push_str(&format!("{}\n", truncate_chars(text, RESULT_TEXT_CHARS)));
        }
    }
    out
}
