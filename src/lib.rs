//! Prospector: a sales-research report generator
//!
//! This crate crawls a company website within a page budget, optionally queries a
//! web-search API, and asks an LLM agent to turn what it found into a structured
//! research report.

pub mod agent;
pub mod config;
pub mod crawler;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod url;

use thiserror::Error;

/// Main error type for Prospector operations
#[derive(Debug, Error)]
pub enum ProspectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error("No pages could be crawled from {url}")]
    EmptyCrawl { url: String },

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Missing required credential: {0} is not set")]
    MissingCredential(&'static str),
}

/// Errors from fetching a single page
///
/// These are never fatal to a crawl: the controller logs them and skips the URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },
}

impl FetchError {
    /// Returns true if a later attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::ContentMismatch { .. } => false,
        }
    }
}

/// HTML that could not be turned into text at all
#[derive(Debug, Error)]
#[error("HTML parse error: {0}")]
pub struct ParseError(pub String);

/// Errors from the LLM chat-completions API
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Agent reached max iterations ({0})")]
    MaxIterations(usize),
}

/// Errors from the web-search API
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for Prospector operations
pub type Result<T> = std::result::Result<T, ProspectorError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlResult, Crawler, PageMetadata, PageRecord};
pub use report::{Report, Source};
