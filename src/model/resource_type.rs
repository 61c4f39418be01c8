/// Resource type definitions for search queries
///
/// Each variant is one tab of the platform's search page.
use crate::ScrapeError;
use std::fmt;
use std::str::FromStr;

/// The category of search result requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Repositories,
    Code,
    Commits,
    Issues,
    Discussions,
    Packages,
    Marketplace,
    Topics,
    Wikis,
    Users,
}

impl ResourceType {
    /// All known resource types, in the order the search page lists them
    pub const ALL: [ResourceType; 10] = [
        Self::Repositories,
        Self::Code,
        Self::Commits,
        Self::Issues,
        Self::Discussions,
        Self::Packages,
        Self::Marketplace,
        Self::Topics,
        Self::Wikis,
        Self::Users,
    ];

    /// The value sent as the `type` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Repositories => "Repositories",
            Self::Code => "Code",
            Self::Commits => "Commits",
            Self::Issues => "Issues",
            Self::Discussions => "Discussions",
            Self::Packages => "Packages",
            Self::Marketplace => "Marketplace",
            Self::Topics => "Topics",
            Self::Wikis => "Wikis",
            Self::Users => "Users",
        }
    }

    /// The path segment used when building a direct link to a result
    pub fn path_segment(&self) -> String {
        self.as_query().to_lowercase()
    }

    /// Returns true if results of this type are enriched with a second fetch
    /// instead of being linked directly
    pub fn is_repositories(&self) -> bool {
        matches!(self, Self::Repositories)
    }

    /// Returns true if the search response embeds unescaped free text that must be
    /// repaired before it parses as JSON
    pub fn needs_body_repair(&self) -> bool {
        matches!(self, Self::Wikis)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for ResourceType {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_query().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScrapeError::UnknownResourceType(s.to_string()))
    }
}
