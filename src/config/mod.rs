//! Configuration module for Prospector
//!
//! This module handles loading, parsing, and validating the optional TOML configuration
//! file, plus reading API credentials from the environment.
//!
//! # Example
//!
//! ```no_run
//! use prospector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("prospector.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod credentials;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credentials::Credentials;
pub use types::{AgentConfig, Config, CrawlerConfig, SearchConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
