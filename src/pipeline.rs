//! End-to-end report generation: crawl the target, then let the agent research and write
//!
//! The binary drives the two halves separately so it can report progress between them;
//! [`generate_report`] runs both for library callers.

use crate::agent::{ChatClient, CrawlAdditionalSite, GetPageContent, PageBudget, SearchWeb};
use crate::config::{AgentConfig, Config, Credentials};
use crate::crawler::{build_http_client, CrawlResult, Crawler, PageRecord};
use crate::report::{research_prompt, Report};
use crate::search::{ExaSearcher, WebSearcher};
use crate::ProspectorError;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Timeout for LLM and search API calls; completions with tool output can be slow
const API_TIMEOUT: Duration = Duration::from_secs(120);

const RESEARCHER_PROMPT: &str = "You are a sales research assistant. You receive content \
crawled from a company's website and produce a report that helps a sales team approach that \
company. Use the available tools to read full page content, search the web for news, \
competitors and market context, and crawl related sites when they add something the crawled \
pages do not cover. Cite every source you relied on.";

/// The system prompt, including the JSON schema the final answer must follow
pub fn system_prompt() -> String {
    let schema = serde_json::to_string_pretty(&Report::json_schema()).unwrap_or_default();
    format!(
        "{}\n\nWhen you are done researching, answer with a single JSON object (no prose, no \
         markdown) matching this JSON schema:\n{}\n\nUse \"crawl\" or \"search\" as the method \
         of each source.",
        RESEARCHER_PROMPT, schema
    )
}

/// Crawls `start_url` up to `max_pages`, treating an empty result as an error
pub async fn crawl_target(
    crawler: &Crawler,
    start_url: &Url,
    max_pages: usize,
    cancel: &CancellationToken,
) -> Result<CrawlResult, ProspectorError> {
    let result = crawler
        .crawl_with_cancellation(start_url, max_pages, cancel)
        .await;

    if result.is_empty() {
        return Err(ProspectorError::EmptyCrawl {
            url: start_url.to_string(),
        });
    }
    Ok(result)
}

/// Everything the agent needs to research a crawled site
pub struct Researcher {
    chat: ChatClient,
    searcher: Arc<dyn WebSearcher>,
    crawler: Arc<Crawler>,
    agent: AgentConfig,
    default_search_results: usize,
}

impl Researcher {
    pub fn new(
        chat: ChatClient,
        searcher: Arc<dyn WebSearcher>,
        crawler: Arc<Crawler>,
        agent: AgentConfig,
        default_search_results: usize,
    ) -> Self {
        Self {
            chat,
            searcher,
            crawler,
            agent,
            default_search_results,
        }
    }

    /// Wires the OpenAI and Exa clients from configuration and credentials
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        crawler: Arc<Crawler>,
    ) -> Result<Self, ProspectorError> {
        let http_client = build_http_client(&config.user_agent, API_TIMEOUT)?;
        let chat = ChatClient::new(
            http_client.clone(),
            credentials.openai_api_key.clone(),
            config.agent.base_url.clone(),
        );
        let searcher = ExaSearcher::new(
            http_client,
            credentials.exa_api_key.clone(),
            &config.search,
        );

        Ok(Self::new(
            chat,
            Arc::new(searcher),
            crawler,
            config.agent.clone(),
            config.search.default_results,
        ))
    }

    /// Runs the agent over the crawled pages and parses its final answer into a [`Report`]
    ///
    /// Additional crawls requested by the agent share one [`PageBudget`] of
    /// `max-additional-pages` and stop when `cancel` fires.
    pub async fn write_report(
        &self,
        target_url: &Url,
        pages: Vec<PageRecord>,
        cancel: &CancellationToken,
    ) -> Result<Report, ProspectorError> {
        let prompt = research_prompt(target_url.as_str(), &pages, self.agent.preview_chars);
        let pages = Arc::new(pages);
        let budget = Arc::new(PageBudget::new(self.agent.max_additional_pages));

        let agent = self
            .chat
            .agent(self.agent.model.clone())
            .system(system_prompt())
            .tool(GetPageContent::new(
                Arc::clone(&pages),
                self.agent.page_content_chars,
            ))
            .tool(SearchWeb::new(
                Arc::clone(&self.searcher),
                self.default_search_results,
            ))
            .tool(CrawlAdditionalSite::new(
                Arc::clone(&self.crawler),
                Arc::clone(&budget),
                self.agent.max_pages_per_additional_crawl,
                self.agent.preview_chars,
                cancel.clone(),
            ))
            .max_iterations(self.agent.max_iterations)
            .temperature(self.agent.temperature)
            .json_output()
            .build();

        let (report, response) = agent.chat_structured::<Report>(prompt).await?;

        tracing::info!(
            "Report generated after {} iterations ({} tool calls, {} additional pages left)",
            response.iterations,
            response.tool_calls_made.len(),
            budget.remaining()
        );
        Ok(report)
    }
}

/// Crawls `start_url` and produces a report in one call
///
/// Returns the crawled pages alongside the report.
pub async fn generate_report(
    config: &Config,
    credentials: &Credentials,
    start_url: &Url,
    cancel: &CancellationToken,
) -> Result<(Vec<PageRecord>, Report), ProspectorError> {
    let crawler = Arc::new(Crawler::from_config(config)?);
    let crawl = crawl_target(&crawler, start_url, config.crawler.max_pages, cancel).await?;
    let pages = crawl.into_pages();

    let researcher = Researcher::from_config(config, credentials, crawler)?;
    let report = researcher
        .write_report(start_url, pages.clone(), cancel)
        .await?;
    Ok((pages, report))
}
