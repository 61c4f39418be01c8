//! Output records produced by a search

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One search result, as handed back to the caller
///
/// Non-repository results carry a direct link; repository results carry the
/// repository link plus data recovered from the repository page.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ResourceRecord {
    /// A direct link to an issue, wiki page, etc.
    Link { url: String },

    /// A repository enriched with its language breakdown
    Repository {
        link: String,
        extra: RepositoryExtra,
    },
}

impl ResourceRecord {
    /// Returns the URL this record points to, whichever variant it is
    pub fn url(&self) -> &str {
        match self {
            Self::Link { url } => url,
            Self::Repository { link, .. } => link,
        }
    }
}

/// Data recovered from a repository page
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RepositoryExtra {
    pub owner: String,
    pub language_stats: LanguageStats,
}

/// Language name to percentage share, kept in document order
///
/// Equality compares the mappings, not the order they were discovered in.
#[derive(Debug, Clone, Default)]
pub struct LanguageStats {
    entries: Vec<(String, f64)>,
}

impl LanguageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a language share, replacing any earlier value for the same name
    pub fn insert(&mut self, language: impl Into<String>, percentage: f64) {
        let language = language.into();
        match self.entries.iter_mut().find(|(name, _)| *name == language) {
            Some(entry) => entry.1 = percentage,
            None => self.entries.push((language, percentage)),
        }
    }

    pub fn get(&self, language: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == language)
            .map(|(_, pct)| *pct)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, pct)| (name.as_str(), *pct))
    }
}

impl PartialEq for LanguageStats {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, pct)| other.get(name) == Some(pct))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for LanguageStats {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut stats = Self::new();
        for (language, percentage) in iter {
            stats.insert(language, percentage);
        }
        stats
    }
}

impl Serialize for LanguageStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (language, percentage) in &self.entries {
            map.serialize_entry(language, percentage)?;
        }
        map.end()
    }
}
