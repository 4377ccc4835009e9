use crate::config::SearchConfig;
use crate::search::{SearchResult, WebSearcher};
use crate::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Exa-backed web searcher
///
/// Calls `POST {base_url}/search` with autoprompting and page text enabled.
pub struct ExaSearcher {
    client: Client,
    api_key: String,
    base_url: String,
    max_results: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: usize,
    use_autoprompt: bool,
    contents: Contents,
}

#[derive(Serialize)]
struct Contents {
    text: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    url: String,
    title: Option<String>,
    text: Option<String>,
    published_date: Option<String>,
}

impl ExaSearcher {
    pub fn new(client: Client, api_key: impl Into<String>, config: &SearchConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results.max(1),
        }
    }
}

#[async_trait]
impl WebSearcher for ExaSearcher {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        let num_results = num_results.clamp(1, self.max_results);
        tracing::info!("Searching: {} ({} results)", query, num_results);

        let request = SearchRequest {
            query,
            num_results,
            use_autoprompt: true,
            contents: Contents { text: true },
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let mut results: Vec<SearchResult> = parsed
            .results
            .into_iter()
            .map(|r| SearchResult {
                url: r.url,
                title: r.title,
                text: r.text,
                published_date: r.published_date,
            })
            .collect();
        results.truncate(num_results);

        tracing::debug!("Search '{}' returned {} results", query, results.len());
        Ok(results)
    }
}
