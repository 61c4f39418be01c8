//! Hub-Sift: a search-results scraper for a code-hosting platform
//!
//! This crate fetches a search results page through rotating proxies, recovers the
//! JSON payload embedded in the server-rendered HTML, and turns every result into a
//! [`ResourceRecord`]. Repository results are enriched with a second fetch that
//! recovers the repository's language breakdown.

pub mod config;
pub mod crawler;
pub mod model;

use thiserror::Error;

/// Main error type for Hub-Sift operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Proxy pool is empty")]
    EmptyProxyPool,

    #[error("Search needs at least one keyword")]
    EmptyKeywords,

    #[error("Invalid proxy address {proxy}: {source}")]
    InvalidProxy {
        proxy: String,
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] ::url::ParseError),

    #[error("No data for {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Response has no body element")]
    MissingBody,

    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload has no payload.results array")]
    MissingResults,

    #[error("Result #{index} is malformed: {message}")]
    DataShape { index: usize, message: String },

    #[error("Search did not finish within {budget:?}")]
    Timeout { budget: std::time::Duration },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),
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

    #[error("Invalid resource type in config: {0}")]
    ResourceType(String),
}

// Re-export commonly used types
pub use config::ScraperConfig;
pub use crawler::{fetch_links, Pipeline, SearchOutcome};
pub use model::{LanguageStats, ResourceRecord, ResourceType, SearchRequest};
