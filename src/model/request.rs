//! Caller-provided search request

use crate::crawler::ProxyPool;
use crate::model::ResourceType;
use crate::ScrapeError;

/// An immutable, validated search request
///
/// Construction checks the preconditions that must hold before any network
/// activity: at least one keyword, no blank keywords, and a non-empty proxy pool.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    keywords: Vec<String>,
    resource_type: ResourceType,
    proxies: ProxyPool,
}

impl SearchRequest {
    /// Creates a new search request
    ///
    /// # Arguments
    ///
    /// * `keywords` - Search terms, joined with `+` in the query
    /// * `resource_type` - Which search tab to query
    /// * `proxies` - Proxy addresses to rotate through
    ///
    /// # Returns
    ///
    /// * `Ok(SearchRequest)` - The validated request
    /// * `Err(ScrapeError::EmptyKeywords)` - No keyword was given, or one is blank
    /// * `Err(ScrapeError::EmptyProxyPool)` - No proxy was given
    pub fn new<K, P>(
        keywords: K,
        resource_type: ResourceType,
        proxies: P,
    ) -> Result<Self, ScrapeError>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(Into::into)
            .map(|kw: String| kw.trim().to_string())
            .collect();

        if keywords.is_empty() || keywords.iter().any(String::is_empty) {
            return Err(ScrapeError::EmptyKeywords);
        }

        let proxies = ProxyPool::new(proxies.into_iter().map(Into::into).collect())?;

        Ok(Self {
            keywords,
            resource_type,
            proxies,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn proxies(&self) -> &ProxyPool {
        &self.proxies
    }

    /// Builds the relative search path, e.g. `search?q=python+django&type=Repositories`
    ///
    /// Each keyword is form-encoded on its own so that `+` stays the separator.
    pub fn search_path(&self) -> String {
        let query = self
            .keywords
            .iter()
            .map(|kw| url::form_urlencoded::byte_serialize(kw.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join("+");

        format!("search?q={}&type={}", query, self.resource_type.as_query())
    }
}
