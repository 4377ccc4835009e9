//! Research report types, prompt budgeting and rendering
//!
//! This module handles:
//! - The structured report the agent must produce
//! - Truncating crawled content into a prompt-sized digest
//! - Rendering reports for the terminal and as markdown

mod digest;
mod render;

pub use digest::{page_digest, research_prompt, truncate_chars};
pub use render::{render_markdown, render_text, write_markdown};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A structured sales-research report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    /// Executive summary of the company and opportunity
    pub summary: String,

    /// Key findings, one per entry
    pub key_points: Vec<String>,

    /// Recommended sales approaches, one per entry
    pub recommendations: Vec<String>,

    /// Where the information came from
    pub sources: Vec<Source>,
}

/// A source cited in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    pub url: String,

    /// How the source was obtained, e.g. "crawl" or "search"
    pub method: String,

    /// Why the source matters
    pub relevance: String,
}

impl Report {
    /// JSON schema of the report, for instructing the model
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Report)).unwrap_or_default()
    }
}
