//! Report-generation agent
//!
//! A thin client for an OpenAI-compatible chat-completions API, a tool-calling loop,
//! and the research tools the model can use while writing a report.

mod client;
mod runner;
pub mod tool;
pub mod tools;

pub use client::ChatClient;
pub use runner::{Agent, AgentBuilder, AgentResponse};
pub use tool::{ErasedTool, Tool, ToolCall, ToolDefinition, ToolError};
pub use tools::{CrawlAdditionalSite, GetPageContent, PageBudget, SearchWeb};
