use serde::Serialize;
use std::collections::BTreeMap;

/// Metadata captured alongside a page's text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMetadata {
    /// `<meta name="description">` content; `null` when the tag is absent
    pub description: Option<String>,

    /// `<meta name="keywords">` content; `null` when the tag is absent
    pub keywords: Option<String>,

    /// HTTP status of the final response
    pub status: u16,

    /// Response headers
    pub headers: BTreeMap<String, String>,
}

/// The extracted representation of one fetched page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    /// The URL that was requested
    pub url: String,

    /// The page title
    pub title: Option<String>,

    /// Readable text content
    pub content: String,

    pub metadata: PageMetadata,
}

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrawlOutcome {
    /// No pending URLs were left
    Exhausted,
    /// The page budget was reached
    BudgetReached,
    /// The crawl was cancelled; pages completed so far are kept
    Cancelled,
}

/// Pages from one crawl run, in completion order
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub pages: Vec<PageRecord>,
    pub outcome: CrawlOutcome,
    /// Fetches started
    pub attempted: usize,
    /// Fetches that failed and were skipped
    pub failed: usize,
}

impl CrawlResult {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// URLs of the recorded pages, in completion order
    pub fn urls(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.url.as_str()).collect()
    }

    pub fn into_pages(self) -> Vec<PageRecord> {
        self.pages
    }
}
