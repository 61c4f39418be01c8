//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building one HTTP client per proxy in the pool
//! - Picking a proxy for every request
//! - Gating responses on the exact success status
//! - Classifying transport errors

use crate::config::HttpConfig;
use crate::crawler::ProxyPool;
use crate::ScrapeError;
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
///
/// Only [`FetchResult::Success`] carries data. The other variants are the normal
/// "no data" outcome and never surface as a Rust error.
#[derive(Debug)]
pub enum FetchResult {
    /// Server answered 200 OK
    Success {
        /// Raw response body
        body: Vec<u8>,
    },

    /// Server answered with any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body on success, `None` otherwise
    pub fn into_body(self) -> Option<Vec<u8>> {
        match self {
            Self::Success { body } => Some(body),
            _ => None,
        }
    }

    /// Short description of why no data was returned
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Source of raw pages, addressed by path relative to the platform's base URL
///
/// [`HttpFetcher`] is the production implementation; the pipeline is generic over
/// this trait so it can be driven by canned responses.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Performs exactly one GET for `path`
    async fn fetch(&self, path: &str) -> FetchResult;
}

/// Builds an HTTP client that sends every request through `proxy`
///
/// # Arguments
///
/// * `config` - Timeout and user agent settings
/// * `proxy` - Proxy address, `host:port` or a full proxy URL
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScrapeError)` - The proxy address is invalid or the client could not be built
pub fn build_http_client(config: &HttpConfig, proxy: &str) -> Result<Client, ScrapeError> {
    let proxy_url = ProxyPool::proxy_url(proxy);
    let proxy = Proxy::all(&proxy_url).map_err(|source| ScrapeError::InvalidProxy {
        proxy: proxy_url.clone(),
        source,
    })?;

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .proxy(proxy)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a URL and applies the status gate
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Success` with the body |
/// | Any other status | `HttpError` |
/// | Timeout, connection refused, DNS failure | `NetworkError` |
/// | Body read fails | `NetworkError` |
///
/// Every non-success outcome is logged with its cause.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if status != StatusCode::OK {
                tracing::warn!(
                    "Failed to retrieve data from {}. Status code: {}",
                    url,
                    status.as_u16()
                );
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.bytes().await {
                Ok(body) => FetchResult::Success {
                    body: body.to_vec(),
                },
                Err(e) => {
                    tracing::warn!("Failed to read body from {}: {}", url, e);
                    FetchResult::NetworkError {
                        error: e.to_string(),
                    }
                }
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            tracing::warn!("Failed to retrieve data from {}: {}", url, error);
            FetchResult::NetworkError { error }
        }
    }
}

/// Fetcher that rotates through a proxy pool
///
/// One client is built per proxy up front and reused for every request of an
/// invocation.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    proxies: ProxyPool,
    clients: Vec<Client>,
}

impl HttpFetcher {
    /// Creates a fetcher for the given configuration and proxy pool
    pub fn new(config: &HttpConfig, proxies: &ProxyPool) -> Result<Self, ScrapeError> {
        let base = url::Url::parse(&config.base_url)?;

        let clients = proxies
            .iter()
            .map(|proxy| build_http_client(config, proxy))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Built {} proxy clients", proxies.len());

        Ok(Self {
            base_url: base.as_str().trim_end_matches('/').to_string(),
            proxies: proxies.clone(),
            clients,
        })
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> FetchResult {
        let (index, proxy) = self.proxies.choose();
        let url = self.url_for(path);
        tracing::debug!("GET {} via {}", url, proxy);
        fetch_url(&self.clients[index], &url).await
    }
}
