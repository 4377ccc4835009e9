use crate::config::types::{AgentConfig, Config, CrawlerConfig, SearchConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on concurrent fetches; the crawler is meant to be polite.
const MAX_CONCURRENCY: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_agent_config(&config.agent)?;
    validate_search_config(&config.search)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1, got 0".to_string(),
        ));
    }

    if config.max_concurrent_pages < 1 || config.max_concurrent_pages > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrent_pages
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    for selector in &config.excluded_selectors {
        Selector::parse(selector)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates agent configuration
fn validate_agent_config(config: &AgentConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("agent model cannot be empty".to_string()));
    }

    validate_base_url("agent base-url", &config.base_url)?;

    if config.max_iterations < 1 {
        return Err(ConfigError::Validation(
            "agent max_iterations must be >= 1".to_string(),
        ));
    }

    if let Some(temperature) = config.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Validation(format!(
                "agent temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }
    }

    if config.preview_chars < 1 || config.page_content_chars < 1 {
        return Err(ConfigError::Validation(
            "preview_chars and page_content_chars must be >= 1".to_string(),
        ));
    }

    if config.max_pages_per_additional_crawl < 1 {
        return Err(ConfigError::Validation(
            "max_pages_per_additional_crawl must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_base_url("search base-url", &config.base_url)?;

    if config.max_results < 1 {
        return Err(ConfigError::Validation(
            "search max_results must be >= 1".to_string(),
        ));
    }

    if config.default_results < 1 || config.default_results > config.max_results {
        return Err(ConfigError::Validation(format!(
            "search default_results must be between 1 and {}, got {}",
            config.max_results, config.default_results
        )));
    }

    Ok(())
}

/// Validates that a base URL parses and uses HTTP(S)
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use HTTP or HTTPS, got '{}'",
            field, value
        )));
    }

    Ok(())
}
