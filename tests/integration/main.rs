//! Integration tests for Prospector
//!
//! These tests use wiremock to stand in for websites and for the search and
//! chat-completions APIs.

mod agent_tests;
mod crawl_tests;
mod search_tests;

use prospector::crawler::{ContentExtractor, Crawler, HttpFetcher};
use std::sync::Arc;
use std::time::Duration;
use wiremock::ResponseTemplate;

/// A 200 response carrying `body` as HTML
pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

/// A crawler with fast retries, suitable for mock servers
pub fn test_crawler(max_concurrent: usize) -> Crawler {
    let fetcher = HttpFetcher::new(reqwest::Client::new(), 2, Duration::from_millis(10));
    let extractor = ContentExtractor::new(&["script", "style", "nav"]).unwrap();
    Crawler::new(Arc::new(fetcher), extractor, max_concurrent)
}
