//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier for the whole run and drives the
//! fetch → extract → discover loop:
//! - Launching fetches from the FIFO frontier, up to the concurrency limit
//! - Enforcing the page budget on successful visits
//! - Recording pages and enqueueing newly discovered same-site links
//! - Stopping early on cancellation

use crate::config::Config;
use crate::crawler::extractor::{ContentExtractor, ExtractedContent};
use crate::crawler::fetcher::{FetchedPage, HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::links::discover_links;
use crate::crawler::record::{CrawlOutcome, CrawlResult, PageRecord};
use crate::url::SiteScope;
use crate::{FetchError, ProspectorError};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

type FetchOutcome = (Url, Result<FetchedPage, FetchError>);

/// Bounded site crawler
///
/// A `Crawler` holds no per-run state; each call to [`Crawler::crawl`] creates a fresh
/// frontier, so one instance can serve several crawls (including concurrent ones).
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    extractor: ContentExtractor,
    max_concurrent: usize,
}

impl Crawler {
    /// Creates a crawler from its collaborators
    ///
    /// `max_concurrent` is clamped to at least 1.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: ContentExtractor,
        max_concurrent: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Creates a crawler backed by [`HttpFetcher`]
    pub fn from_config(config: &Config) -> Result<Self, ProspectorError> {
        let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
        let extractor = ContentExtractor::new(&config.crawler.excluded_selectors)?;
        Ok(Self::new(
            Arc::new(fetcher),
            extractor,
            config.crawler.max_concurrent_pages,
        ))
    }

    /// Crawls a site with no cancellation
    pub async fn crawl(&self, start_url: &Url, max_pages: usize) -> CrawlResult {
        self.crawl_with_cancellation(start_url, max_pages, &CancellationToken::new())
            .await
    }

    /// Crawls a site until the frontier is exhausted, the budget is reached, or the
    /// token is cancelled
    ///
    /// # Algorithm
    ///
    /// 1. Seed the frontier with `start_url`
    /// 2. While fetch slots are free and `visited + in_flight < max_pages`, pop the
    ///    oldest pending URL and start fetching it
    /// 3. Wait for the next fetch to finish:
    ///    - failure: log and skip (no retry here, not counted toward the budget)
    ///    - success: mark visited, extract content, record the page, enqueue new
    ///      same-origin links
    /// 4. Stop when nothing is in flight and no more fetches can start
    ///
    /// Per-page failures never fail the crawl. An unreachable start URL yields an
    /// empty result.
    pub async fn crawl_with_cancellation(
        &self,
        start_url: &Url,
        max_pages: usize,
        cancel: &CancellationToken,
    ) -> CrawlResult {
        let mut scope = SiteScope::new(start_url);
        let mut frontier = Frontier::new(start_url.clone());
        let mut in_flight: JoinSet<FetchOutcome> = JoinSet::new();
        let mut pages = Vec::new();
        let mut attempted = 0;
        let mut failed = 0;
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} (max {} pages, {} concurrent)",
            start_url,
            max_pages,
            self.max_concurrent
        );

        let outcome = loop {
            if cancel.is_cancelled() {
                in_flight.abort_all();
                break CrawlOutcome::Cancelled;
            }

            // Successful visits can never exceed the budget: a fetch only starts
            // while visited + in_flight is below it.
            while in_flight.len() < self.max_concurrent
                && frontier.visited_count() + in_flight.len() < max_pages
            {
                let Some(url) = frontier.pop() else {
                    break;
                };
                if frontier.is_visited(&url) {
                    continue;
                }

                attempted += 1;
                tracing::debug!("Fetching {}", url);
                let fetcher = Arc::clone(&self.fetcher);
                in_flight.spawn(async move {
                    let result = fetcher.fetch(&url).await;
                    (url, result)
                });
            }

            if in_flight.is_empty() {
                break if frontier.visited_count() >= max_pages {
                    CrawlOutcome::BudgetReached
                } else {
                    CrawlOutcome::Exhausted
                };
            }

            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                joined = in_flight.join_next() => joined,
            };

            let Some(joined) = joined else {
                if cancel.is_cancelled() {
                    in_flight.abort_all();
                    break CrawlOutcome::Cancelled;
                }
                continue;
            };

            match joined {
                Ok((url, Ok(page))) => {
                    // A start URL that redirects off-origin (`acme.com` -> `www.acme.com`)
                    // moves the crawl to the site it landed on.
                    if url == *start_url && !scope.contains(&page.final_url) {
                        tracing::info!(
                            "Start URL redirected to {}, crawling that origin instead",
                            page.final_url
                        );
                        scope = SiteScope::new(&page.final_url);
                    }

                    if let Some(record) = self.process_page(&url, page, &scope, &mut frontier) {
                        tracing::info!(
                            "Crawled {} ({}/{})",
                            record.url,
                            frontier.visited_count(),
                            max_pages
                        );
                        pages.push(record);
                    }
                }
                Ok((url, Err(e))) => {
                    failed += 1;
                    tracing::warn!("Skipping {}: {}", url, e);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Fetch task failed: {}", e);
                }
            }
        };

        tracing::info!(
            "Crawl of {} finished ({:?}): {} pages, {} failed, {} pending, in {:?}",
            start_url,
            outcome,
            pages.len(),
            failed,
            frontier.pending_count(),
            start_time.elapsed()
        );

        CrawlResult {
            pages,
            outcome,
            attempted,
            failed,
        }
    }

    /// Records a fetched page and enqueues its links
    ///
    /// Synchronous on purpose: parsed documents are not `Send` and must not live
    /// across an await point.
    fn process_page(
        &self,
        url: &Url,
        page: FetchedPage,
        scope: &SiteScope,
        frontier: &mut Frontier,
    ) -> Option<PageRecord> {
        if page.final_url != *url && frontier.is_visited(&page.final_url) {
            tracing::debug!(
                "{} redirected to already visited {}, skipping",
                url,
                page.final_url
            );
            return None;
        }
        if !frontier.mark_visited(url) {
            tracing::debug!("Already visited {}, dropping duplicate result", url);
            return None;
        }
        if page.final_url != *url {
            tracing::debug!("{} redirected to {}", url, page.final_url);
            frontier.mark_seen(&page.final_url);
        }

        let content = match self.extractor.extract(&page.body) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to parse HTML for {}: {}", url, e);
                ExtractedContent::default()
            }
        };

        let mut enqueued = 0;
        for link in discover_links(&page.body, &page.final_url, scope) {
            if frontier.push(link) {
                enqueued += 1;
            }
        }
        tracing::debug!("Enqueued {} new links from {}", enqueued, url);

        let metadata = content.metadata(page.status, page.headers);
        Some(PageRecord {
            url: url.to_string(),
            title: content.title,
            content: content.text,
            metadata,
        })
    }
}
