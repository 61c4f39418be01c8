//! Language breakdown parser for repository pages
//!
//! The repository page lists its languages as a row of link widgets, each holding
//! a name span and a percentage span.

use crate::model::{LanguageStats, RepositoryExtra, ResourceRecord};
use scraper::{ElementRef, Html, Selector};

/// Class list that marks one language widget
pub const LANGUAGE_WIDGET_CLASS: &str =
    "d-inline-flex flex-items-center flex-nowrap Link--secondary no-underline text-small mr-3";

/// CSS selector matching elements that carry every class of the widget signature
fn widget_selector_source() -> String {
    LANGUAGE_WIDGET_CLASS
        .split_whitespace()
        .map(|class| format!(".{}", class))
        .collect()
}

/// Parses the language widgets of a repository page
///
/// Widgets that do not hold exactly two spans, or whose second span is not a
/// percentage, are skipped. A page with no widgets gives an empty mapping.
///
/// # Example
///
/// ```
/// use hub_sift::crawler::parse_language_stats;
///
/// let html = r#"<a class="d-inline-flex flex-items-center flex-nowrap Link--secondary no-underline text-small mr-3">
///     <span>Rust</span><span>99.5%</span></a>"#;
/// let stats = parse_language_stats(html);
/// assert_eq!(stats.get("Rust"), Some(99.5));
/// ```
pub fn parse_language_stats(html: &str) -> LanguageStats {
    let document = Html::parse_document(html);
    let mut stats = LanguageStats::new();

    let widget_source = widget_selector_source();
    let (Ok(widget_selector), Ok(span_selector)) =
        (Selector::parse(&widget_source), Selector::parse("span"))
    else {
        return stats;
    };

    for widget in document.select(&widget_selector) {
        match parse_widget(widget, &span_selector) {
            Some((language, percentage)) => stats.insert(language, percentage),
            None => tracing::debug!("Skipping malformed language widget: {}", widget.html()),
        }
    }

    stats
}

fn parse_widget(widget: ElementRef<'_>, span_selector: &Selector) -> Option<(String, f64)> {
    let texts: Vec<String> = widget
        .select(span_selector)
        .map(|span| span.text().collect::<String>().trim().to_string())
        .collect();

    let [language, percentage] = texts.as_slice() else {
        return None;
    };

    if language.is_empty() {
        return None;
    }
    let value = percentage
        .strip_suffix('%')?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=100.0).contains(v))?;

    Some((language.clone(), value))
}

/// Builds the record for a repository from its `owner/repo` path and page HTML
pub fn build_repository_record(path: &str, html: &str, base_url: &str) -> ResourceRecord {
    let owner = path.split('/').next().unwrap_or(path).to_string();

    ResourceRecord::Repository {
        link: format!("{}/{}", base_url, path),
        extra: RepositoryExtra {
            owner,
            language_stats: parse_language_stats(html),
        },
    }
}
