//! Search pipeline - orchestration of one search
//!
//! One invocation moves through these steps:
//! - Fetch the search results page through a proxy
//! - Recover the embedded payload, repairing it first for wiki searches
//! - Turn every result entry into a record or an enrichment request
//! - Fetch repository pages concurrently and parse their language breakdown
//! - Reassemble the records in result order
//!
//! Any failure aborts the whole invocation; there are no partial results.

use crate::config::{HttpConfig, ScraperConfig};
use crate::crawler::extractor::{extract, Extraction};
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::languages::build_repository_record;
use crate::crawler::payload::parse_search_page;
use crate::model::{ResourceRecord, SearchRequest};
use crate::ScrapeError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Duration;

/// How a search ended
///
/// Keeps "nothing matched" apart from "the search failed", which the plain
/// record list cannot express.
#[derive(Debug)]
pub enum SearchOutcome {
    /// At least one record was produced
    Matches(Vec<ResourceRecord>),

    /// The search succeeded but returned no results
    NoMatches,

    /// The search failed; the cause has already been logged
    Failed(ScrapeError),
}

impl SearchOutcome {
    /// The records, or an empty slice if there are none or the search failed
    pub fn records(&self) -> &[ResourceRecord] {
        match self {
            Self::Matches(records) => records,
            _ => &[],
        }
    }

    /// Degrades to a plain record list, empty on failure
    pub fn into_records(self) -> Vec<ResourceRecord> {
        match self {
            Self::Matches(records) => records,
            _ => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error(&self) -> Option<&ScrapeError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Runs searches against one platform through one page fetcher
pub struct Pipeline<F> {
    fetcher: F,
    base_url: String,
    timeout: Duration,
    max_concurrent_fetches: usize,
}

impl<F: PageFetcher> Pipeline<F> {
    /// Creates a pipeline
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Where pages come from
    /// * `config` - Base URL for links, total timeout, and fan-out limit
    pub fn new(fetcher: F, config: &HttpConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_concurrent_fetches: config.max_concurrent_fetches.max(1),
        }
    }

    /// Overrides the total time budget of one search
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides how many repository pages are fetched at once
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// Runs a search and classifies the result
    ///
    /// Failures are logged here and returned as [`SearchOutcome::Failed`].
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        match self.run(request).await {
            Ok(records) if records.is_empty() => {
                tracing::info!("Search returned no results");
                SearchOutcome::NoMatches
            }
            Ok(records) => {
                tracing::info!("Search returned {} records", records.len());
                SearchOutcome::Matches(records)
            }
            Err(e) => {
                tracing::error!("An error occurred: {}", e);
                SearchOutcome::Failed(e)
            }
        }
    }

    /// Runs a search under the total time budget
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ResourceRecord>)` - Records in result order, possibly empty
    /// * `Err(ScrapeError)` - The first failure, or [`ScrapeError::Timeout`]
    pub async fn run(&self, request: &SearchRequest) -> Result<Vec<ResourceRecord>, ScrapeError> {
        tokio::time::timeout(self.timeout, self.execute(request))
            .await
            .map_err(|_| ScrapeError::Timeout {
                budget: self.timeout,
            })?
    }

    async fn execute(&self, request: &SearchRequest) -> Result<Vec<ResourceRecord>, ScrapeError> {
        let resource_type = request.resource_type();
        let path = request.search_path();
        tracing::debug!("Searching {} for {:?}", resource_type, request.keywords());

        let html = self.fetch_page(&path).await?;
        let entries = parse_search_page(&html, resource_type)?;
        tracing::debug!("Search page holds {} results", entries.len());

        // Every entry is checked before any secondary fetch starts
        let extractions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| extract(entry, resource_type, &self.base_url, index))
            .collect::<Result<Vec<_>, _>>()?;

        // Fetches complete in any order, so the first failure surfaces as soon
        // as it happens. Returning early drops the stream and with it every
        // fetch still in flight.
        let mut resolved: Vec<(usize, ResourceRecord)> =
            stream::iter(extractions.into_iter().enumerate())
                .map(|(index, extraction)| async move {
                    self.resolve(extraction).await.map(|record| (index, record))
                })
                .buffer_unordered(self.max_concurrent_fetches)
                .try_collect()
                .await?;

        resolved.sort_unstable_by_key(|(index, _)| *index);
        Ok(resolved.into_iter().map(|(_, record)| record).collect())
    }

    async fn resolve(&self, extraction: Extraction) -> Result<ResourceRecord, ScrapeError> {
        match extraction {
            Extraction::Link(record) => Ok(record),
            Extraction::Enrich { path } => {
                let html = self.fetch_page(&path).await?;
                Ok(build_repository_record(&path, &html, &self.base_url))
            }
        }
    }

    async fn fetch_page(&self, path: &str) -> Result<String, ScrapeError> {
        match self.fetcher.fetch(path).await {
            FetchResult::Success { body } => Ok(String::from_utf8_lossy(&body).into_owned()),
            other => Err(ScrapeError::Fetch {
                path: path.to_string(),
                reason: other.failure_reason().unwrap_or_default(),
            }),
        }
    }
}

/// Runs the search described by a configuration over HTTP
///
/// This is the main entry point for callers that hold a [`ScraperConfig`]. It
/// validates the request, builds the proxy-rotating fetcher, and runs the
/// pipeline. Precondition failures are reported before any network activity.
///
/// # Example
///
/// ```no_run
/// use hub_sift::config::load_config;
/// use hub_sift::crawler::fetch_links;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("search.toml"))?;
/// for record in fetch_links(&config).await.into_records() {
///     println!("{}", record.url());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_links(config: &ScraperConfig) -> SearchOutcome {
    let prepared = config.search_request().and_then(|request| {
        let fetcher = HttpFetcher::new(&config.http, request.proxies())?;
        Ok((request, fetcher))
    });

    match prepared {
        Ok((request, fetcher)) => Pipeline::new(fetcher, &config.http).search(&request).await,
        Err(e) => {
            tracing::error!("Search not started: {}", e);
            SearchOutcome::Failed(e)
        }
    }
}
