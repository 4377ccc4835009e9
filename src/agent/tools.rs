//! Research tools exposed to the report agent
//!
//! - `get_page_content`: full(er) text of one crawled page
//! - `search_web`: web search through a [`WebSearcher`]
//! - `crawl_additional_site`: re-enters the crawler on another site, under a
//!   cumulative [`PageBudget`]

use crate::agent::tool::Tool;
use crate::crawler::{Crawler, PageRecord};
use crate::report::{page_digest, truncate_chars};
use crate::search::{format_results, WebSearcher};
use crate::url::parse_start_url;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cumulative page allowance shared by every agent-initiated crawl
///
/// Each crawl reserves pages up front and refunds what it did not use, so the
/// total fetched across all recursive crawls never exceeds the cap no matter how
/// often the model asks.
#[derive(Debug)]
pub struct PageBudget {
    remaining: AtomicUsize,
}

impl PageBudget {
    pub fn new(total: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(total),
        }
    }

    /// Reserves up to `requested` pages; returns how many were granted (possibly 0)
    pub fn reserve(&self, requested: usize) -> usize {
        let mut granted = 0;
        let _ = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                granted = requested.min(remaining);
                Some(remaining - granted)
            });
        granted
    }

    /// Returns unused pages to the budget
    pub fn refund(&self, unused: usize) {
        self.remaining.fetch_add(unused, Ordering::SeqCst);
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPageContentArgs {
    /// Zero-based page number from the initial crawl digest
    pub page_number: i64,
}

/// Returns URL, title and a longer content excerpt for one crawled page
pub struct GetPageContent {
    pages: Arc<Vec<PageRecord>>,
    max_chars: usize,
}

impl GetPageContent {
    pub fn new(pages: Arc<Vec<PageRecord>>, max_chars: usize) -> Self {
        Self { pages, max_chars }
    }
}

#[async_trait]
impl Tool for GetPageContent {
    const NAME: &'static str = "get_page_content";
    type Args = GetPageContentArgs;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Get content from a specific page number of the crawled site"
    }

    async fn call(&self, args: Self::Args) -> Result<String, Self::Error> {
        let page = usize::try_from(args.page_number)
            .ok()
            .and_then(|n| self.pages.get(n));

        let Some(page) = page else {
            return Ok(format!(
                "Invalid page number. Please choose between 0 and {}",
                self.pages.len() as i64 - 1
            ));
        };

        Ok(format!(
            "URL: {}\nTitle: {}\nContent: {}",
            page.url,
            page.title.as_deref().unwrap_or("(untitled)"),
            truncate_chars(&page.content, self.max_chars)
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchWebArgs {
    /// Search query
    pub query: String,
    /// Number of results to return
    #[serde(default)]
    pub num_results: Option<usize>,
}

/// Searches the web; failures are reported to the model as text
pub struct SearchWeb {
    searcher: Arc<dyn WebSearcher>,
    default_results: usize,
}

impl SearchWeb {
    pub fn new(searcher: Arc<dyn WebSearcher>, default_results: usize) -> Self {
        Self {
            searcher,
            default_results,
        }
    }
}

#[async_trait]
impl Tool for SearchWeb {
    const NAME: &'static str = "search_web";
    type Args = SearchWebArgs;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Search the web for relevant information about the company, its market, competitors and news"
    }

    async fn call(&self, args: Self::Args) -> Result<String, Self::Error> {
        let num_results = args.num_results.unwrap_or(self.default_results);
        match self.searcher.search(&args.query, num_results).await {
            Ok(results) => Ok(format_results(&args.query, &results)),
            Err(e) => {
                tracing::warn!("Search for '{}' failed: {}", args.query, e);
                Ok(format!("Search failed: {}", e))
            }
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CrawlAdditionalSiteArgs {
    /// URL of the site to crawl
    pub url: String,
    /// Maximum pages to crawl on that site
    #[serde(default)]
    pub max_pages: Option<usize>,
}

/// Crawls another site on the model's request, within the shared page budget
pub struct CrawlAdditionalSite {
    crawler: Arc<Crawler>,
    budget: Arc<PageBudget>,
    max_pages_per_crawl: usize,
    preview_chars: usize,
    cancel: CancellationToken,
}

impl CrawlAdditionalSite {
    pub fn new(
        crawler: Arc<Crawler>,
        budget: Arc<PageBudget>,
        max_pages_per_crawl: usize,
        preview_chars: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            crawler,
            budget,
            max_pages_per_crawl,
            preview_chars,
            cancel,
        }
    }
}

#[async_trait]
impl Tool for CrawlAdditionalSite {
    const NAME: &'static str = "crawl_additional_site";
    type Args = CrawlAdditionalSiteArgs;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Crawl another website (for example a competitor or parent company) and return a digest of its pages"
    }

    async fn call(&self, args: Self::Args) -> Result<String, Self::Error> {
        let start_url = match parse_start_url(&args.url) {
            Ok(url) => url,
            Err(reason) => return Ok(format!("Invalid URL '{}': {}", args.url, reason)),
        };

        let requested = args
            .max_pages
            .unwrap_or(self.max_pages_per_crawl)
            .clamp(1, self.max_pages_per_crawl);
        let granted = self.budget.reserve(requested);
        if granted == 0 {
            tracing::info!("Additional crawl of {} refused: page budget exhausted", start_url);
            return Ok(
                "Additional crawling budget exhausted; work with the information already gathered."
                    .to_string(),
            );
        }

        let result = self
            .crawler
            .crawl_with_cancellation(&start_url, granted, &self.cancel)
            .await;
        self.budget.refund(granted.saturating_sub(result.len()));

        if result.is_empty() {
            return Ok(format!("No pages could be crawled from {}", start_url));
        }

        Ok(format!(
            "Crawled {} pages from {}:\n\n{}",
            result.len(),
            start_url,
            page_digest(&result.pages, self.preview_chars)
        ))
    }
}
