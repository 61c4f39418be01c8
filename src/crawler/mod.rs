//! Crawler module for search page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - Proxy selection and HTTP fetching
//! - Recovery and repair of the embedded search payload
//! - Per-type result extraction
//! - Repository language breakdown parsing
//! - Overall search orchestration

mod extractor;
mod fetcher;
mod languages;
mod payload;
mod pipeline;
mod proxy;
mod repair;

pub use extractor::{extract, strip_highlight, Extraction, SearchHit};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use languages::{build_repository_record, parse_language_stats, LANGUAGE_WIDGET_CLASS};
pub use payload::{extract_body_text, parse_search_page};
pub use pipeline::{fetch_links, Pipeline, SearchOutcome};
pub use proxy::ProxyPool;
pub use repair::repair_body;
