//! Crawler module for bounded site crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Readable-text and metadata extraction
//! - Same-site link discovery
//! - The FIFO frontier and the crawl controller

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod links;
mod record;

pub use coordinator::Crawler;
pub use extractor::{ContentExtractor, ExtractedContent};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::Frontier;
pub use links::discover_links;
pub use record::{CrawlOutcome, CrawlResult, PageMetadata, PageRecord};

use crate::config::Config;
use crate::ProspectorError;
use url::Url;

/// Crawls a website with settings taken from the configuration
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Build the HTTP client and extractor
/// 2. Traverse same-origin pages breadth-first from `start_url`
/// 3. Stop at `config.crawler.max_pages` successful pages
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Pages in completion order (possibly empty)
/// * `Err(ProspectorError)` - The crawler could not be constructed
pub async fn crawl_website(config: &Config, start_url: &Url) -> Result<CrawlResult, ProspectorError> {
    let crawler = Crawler::from_config(config)?;
    Ok(crawler.crawl(start_url, config.crawler.max_pages).await)
}
