use serde::Deserialize;

/// Main configuration structure for Prospector
///
/// Every section is optional; an empty file is equivalent to `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub agent: AgentConfig,
    pub search: SearchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of distinct pages successfully visited per crawl
    pub max_pages: usize,

    /// Maximum number of page fetches in flight at once
    pub max_concurrent_pages: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retries for transient fetch failures (timeouts, 5xx, 429)
    pub max_retries: u32,

    /// Base delay before the first retry; doubles on each attempt (milliseconds)
    pub retry_backoff_ms: u64,

    /// CSS selectors whose subtrees are dropped before text extraction
    pub excluded_selectors: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            max_concurrent_pages: 2,
            request_timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
            excluded_selectors: [
                "script",
                "style",
                "nav",
                "footer",
                "iframe",
                "noscript",
                ".cookie-banner",
                ".ad",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub name: String,

    /// Version of the crawler
    pub version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "Prospector".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Report-generation agent configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AgentConfig {
    /// Chat model name
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Maximum chat round-trips before giving up
    pub max_iterations: usize,

    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,

    /// Characters of each page included in the initial prompt
    pub preview_chars: usize,

    /// Characters returned by the page-content tool
    pub page_content_chars: usize,

    /// Cumulative cap on pages fetched by agent-initiated crawls
    pub max_additional_pages: usize,

    /// Cap on a single agent-initiated crawl
    pub max_pages_per_additional_crawl: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_iterations: 10,
            temperature: None,
            preview_chars: 1000,
            page_content_chars: 1500,
            max_additional_pages: 15,
            max_pages_per_additional_crawl: 5,
        }
    }
}

/// Web search configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Base URL of the Exa search API
    pub base_url: String,

    /// Results returned when the agent does not ask for a count
    pub default_results: usize,

    /// Upper bound on results per query
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.exa.ai".to_string(),
            default_results: 3,
            max_results: 10,
        }
    }
}
