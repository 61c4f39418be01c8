use crate::config::types::{HttpConfig, ScraperConfig, SearchConfig};
use crate::model::ResourceType;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates the search section
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "keywords must contain at least one entry".to_string(),
        ));
    }

    if config.keywords.iter().any(|kw| kw.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords cannot contain blank entries".to_string(),
        ));
    }

    if config.proxies.is_empty() {
        return Err(ConfigError::Validation(
            "proxies must contain at least one entry".to_string(),
        ));
    }

    for proxy in &config.proxies {
        validate_proxy(proxy)?;
    }

    config
        .resource_type
        .parse::<ResourceType>()
        .map_err(|_| ConfigError::ResourceType(config.resource_type.clone()))?;

    Ok(())
}

/// Validates a proxy address (`host:port` or a full proxy URL)
fn validate_proxy(proxy: &str) -> Result<(), ConfigError> {
    let proxy = proxy.trim();
    if proxy.is_empty() {
        return Err(ConfigError::Validation(
            "proxies cannot contain blank entries".to_string(),
        ));
    }

    let candidate = if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy '{}' has no host",
            proxy
        )));
    }

    Ok(())
}

/// Validates the HTTP section
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 64, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
