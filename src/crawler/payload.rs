//! Recovery of the JSON payload embedded in a search results page

use crate::crawler::repair::repair_body;
use crate::model::ResourceType;
use crate::ScrapeError;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

/// Top level of the embedded payload: `{"payload": {"results": [...]}}`
#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    payload: Option<PayloadBody>,
}

#[derive(Debug, Deserialize)]
struct PayloadBody {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

impl SearchPayload {
    /// The raw result entries, in page order
    pub fn into_results(self) -> Result<Vec<Value>, ScrapeError> {
        self.payload
            .and_then(|p| p.results)
            .ok_or(ScrapeError::MissingResults)
    }
}

/// Returns the text content of the page's `body` element
pub fn extract_body_text(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body").map_err(|_| ScrapeError::MissingBody)?;

    document
        .select(&selector)
        .next()
        .map(|body| body.text().collect::<String>())
        .ok_or(ScrapeError::MissingBody)
}

/// Parses a search results page into its raw result entries
///
/// # Arguments
///
/// * `html` - The search results page
/// * `resource_type` - Decides whether the body text is repaired before parsing
///
/// # Returns
///
/// * `Ok(Vec<Value>)` - The `payload.results` entries, possibly empty
/// * `Err(ScrapeError::Json)` - The body text is not JSON, even after repair
/// * `Err(ScrapeError::MissingResults)` - The JSON has no `payload.results` array
pub fn parse_search_page(html: &str, resource_type: ResourceType) -> Result<Vec<Value>, ScrapeError> {
    let text = extract_body_text(html)?;

    let text = if resource_type.needs_body_repair() {
        repair_body(&text)
    } else {
        Cow::Borrowed(text.as_str())
    };

    let payload: SearchPayload = serde_json::from_str(text.trim())?;
    payload.into_results()
}
