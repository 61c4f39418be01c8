use crate::model::{ResourceType, SearchRequest};
use crate::{ConfigError, ScrapeError};
use serde::Deserialize;

/// Default platform base URL
pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Default total time budget for one search, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on concurrent repository page fetches
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Main configuration structure for Hub-Sift
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScraperConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// What to search for and through which proxies
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search terms
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Resource type name, e.g. "Repositories", "Issues", "Wikis"
    #[serde(rename = "type", default = "default_resource_type")]
    pub resource_type: String,

    /// Proxy addresses (`host:port`)
    #[serde(default)]
    pub proxies: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            resource_type: default_resource_type(),
            proxies: Vec::new(),
        }
    }
}

/// HTTP behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Platform base URL; links in records are built on it too
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Total time budget for one search (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of repository pages fetched at once
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_resource_type() -> String {
    ResourceType::Repositories.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl ScraperConfig {
    /// Parses the configured resource type
    pub fn resource_type(&self) -> Result<ResourceType, ConfigError> {
        self.search
            .resource_type
            .parse()
            .map_err(|_| ConfigError::ResourceType(self.search.resource_type.clone()))
    }

    /// Builds the search request described by this configuration
    ///
    /// Fails before any network activity if the keywords or proxies are empty or
    /// the resource type is unknown.
    pub fn search_request(&self) -> Result<SearchRequest, ScrapeError> {
        SearchRequest::new(
            self.search.keywords.iter().cloned(),
            self.search.resource_type.parse()?,
            self.search.proxies.iter().cloned(),
        )
    }
}
