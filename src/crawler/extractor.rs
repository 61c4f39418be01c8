//! Result extraction
//!
//! Result entries vary by resource type: repository hits name the repository in a
//! highlighted `hl_name`, every other type carries a nested repository reference
//! plus a `number` or a highlighted `hl_title`. Each shape is decoded into its own
//! type before any link is built, so a missing field is an explicit error rather
//! than a malformed URL.

use crate::model::{ResourceRecord, ResourceType};
use crate::ScrapeError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Repository named by a non-repository hit
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner_login: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RepoWrapper {
    #[serde(default)]
    repository: Option<RepositoryRef>,
}

/// Entry-specific identifier, numeric for issues and discussions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(u64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A hit from the repositories tab
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryHit {
    #[serde(default)]
    hl_name: Option<String>,
}

/// A hit from any other tab
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceHit {
    #[serde(default)]
    repo: Option<RepoWrapper>,
    #[serde(default)]
    number: Option<Identifier>,
    #[serde(default)]
    hl_title: Option<String>,
}

impl ResourceHit {
    pub fn repository(&self) -> Option<&RepositoryRef> {
        self.repo.as_ref().and_then(|r| r.repository.as_ref())
    }

    /// `number` when present, the highlighted title otherwise
    pub fn identifier(&self) -> Option<String> {
        self.number
            .as_ref()
            .map(Identifier::to_string)
            .or_else(|| self.hl_title.as_deref().map(strip_highlight))
            .filter(|id| !id.is_empty())
    }
}

/// One decoded result entry
#[derive(Debug, Clone)]
pub enum SearchHit {
    Repository(RepositoryHit),
    Resource(ResourceHit),
}

impl SearchHit {
    /// Decodes a raw result entry according to the resource type it was returned for
    pub fn decode(entry: &Value, resource_type: ResourceType, index: usize) -> Result<Self, ScrapeError> {
        let shape_error = |e: serde_json::Error| ScrapeError::DataShape {
            index,
            message: e.to_string(),
        };

        if resource_type.is_repositories() {
            RepositoryHit::deserialize(entry)
                .map(Self::Repository)
                .map_err(shape_error)
        } else {
            ResourceHit::deserialize(entry)
                .map(Self::Resource)
                .map_err(shape_error)
        }
    }
}

/// What the pipeline should do with one entry
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The record is complete
    Link(ResourceRecord),

    /// The repository page at `path` (`owner/repo`) must be fetched first
    Enrich { path: String },
}

/// Turns one result entry into a record or an enrichment request
///
/// # Arguments
///
/// * `entry` - One element of `payload.results`
/// * `resource_type` - The resource type the search was made for
/// * `base_url` - Platform base URL, without trailing slash
/// * `index` - Position of the entry, used in error messages
///
/// # Returns
///
/// * `Ok(Extraction::Link)` - `{base}/{owner}/{repo}/{type}/{identifier}` for
///   non-repository types
/// * `Ok(Extraction::Enrich)` - the `owner/repo` path for repository hits
/// * `Err(ScrapeError::DataShape)` - a required field is missing
pub fn extract(
    entry: &Value,
    resource_type: ResourceType,
    base_url: &str,
    index: usize,
) -> Result<Extraction, ScrapeError> {
    match SearchHit::decode(entry, resource_type, index)? {
        SearchHit::Repository(hit) => {
            let path = hit
                .hl_name
                .as_deref()
                .map(strip_highlight)
                .map(|name| name.trim_matches('/').to_string())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ScrapeError::DataShape {
                    index,
                    message: "repository hit has no hl_name".to_string(),
                })?;

            Ok(Extraction::Enrich { path })
        }
        SearchHit::Resource(hit) => {
            let repository = hit.repository().ok_or_else(|| ScrapeError::DataShape {
                index,
                message: "missing repo.repository reference".to_string(),
            })?;

            let identifier = hit.identifier().ok_or_else(|| ScrapeError::DataShape {
                index,
                message: "neither number nor hl_title is present".to_string(),
            })?;

            let url = format!(
                "{}/{}/{}/{}/{}",
                base_url,
                repository.owner_login,
                repository.name,
                resource_type.path_segment(),
                identifier
            );

            Ok(Extraction::Link(ResourceRecord::Link { url }))
        }
    }
}

/// Removes the `<em>` markup the search page wraps around matched terms
pub fn strip_highlight(text: &str) -> String {
    text.replace("<em>", "").replace("</em>", "")
}
