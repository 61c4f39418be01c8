//! Proxy selection
//!
//! Every fetch picks its proxy independently and uniformly at random. There is no
//! stickiness and no failover: an unreachable proxy surfaces as a failed fetch.

use crate::ScrapeError;
use rand::Rng;

/// A non-empty pool of proxy addresses (`host:port`, optionally with a scheme)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPool {
    proxies: Vec<String>,
}

impl ProxyPool {
    /// Creates a pool from a list of proxy addresses
    ///
    /// Blank entries are dropped. Fails with [`ScrapeError::EmptyProxyPool`] if
    /// nothing is left.
    pub fn new(proxies: Vec<String>) -> Result<Self, ScrapeError> {
        let proxies: Vec<String> = proxies
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if proxies.is_empty() {
            return Err(ScrapeError::EmptyProxyPool);
        }

        Ok(Self { proxies })
    }

    /// Picks one proxy for a single fetch
    ///
    /// Returns its position in the pool along with its address.
    pub fn choose(&self) -> (usize, &str) {
        let index = rand::thread_rng().gen_range(0..self.proxies.len());
        (index, &self.proxies[index])
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.proxies.iter().map(String::as_str)
    }

    /// Renders a proxy address as a URL reqwest understands
    ///
    /// Bare `host:port` addresses are treated as plain HTTP proxies.
    pub fn proxy_url(address: &str) -> String {
        if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }
}
