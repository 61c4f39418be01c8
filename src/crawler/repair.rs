//! Repair of search payloads that embed unescaped free text
//!
//! Wiki search results carry the page source in `body` and `hl_body` without
//! escaping newlines or quotes, so the payload is not valid JSON. Both fields are
//! useless for building links, so they are cut out. The cut relies on the origin
//! always emitting `body` before `filename` and `hl_body` before `hl_title`; if
//! that order changes the repair silently produces wrong text.

use std::borrow::Cow;

/// Opens a result entry whose first field is the raw page body
const BODY_MARKER: &str = r#"{"body":"#;

/// First field after `body`
const FILENAME_MARKER: &str = r#""filename":"#;

/// Highlighted copy of the body
const HL_BODY_MARKER: &str = r#""hl_body":"#;

/// First field after `hl_body`
const HL_TITLE_MARKER: &str = r#""hl_title":"#;

/// Cuts the unescaped `body` and `hl_body` fields out of every result entry
///
/// For each `{"body":` marker the text up to the next `"filename":` is replaced
/// by `{`, then the text from `"hl_body":` up to the following `"hl_title":` is
/// removed. Markers inside the cut text are never looked at, so page source that
/// itself contains `{"body":` is cut out with the rest.
///
/// Text without the opening marker, JSON or not, is returned unchanged. A marker
/// with no `"filename":` after it stops the repair at that point. Applying the
/// repair to its own output changes nothing.
pub fn repair_body(body: &str) -> Cow<'_, str> {
    if !body.contains(BODY_MARKER) {
        return Cow::Borrowed(body);
    }

    let mut text = body.to_string();
    let mut cursor = 0;

    while let Some(start) = find_from(&text, BODY_MARKER, cursor) {
        let Some(filename) = find_from(&text, FILENAME_MARKER, start) else {
            tracing::debug!("Unterminated body field at offset {}, leaving rest as is", start);
            break;
        };
        text.replace_range(start..filename, "{");

        if let Some(hl_body) = find_from(&text, HL_BODY_MARKER, start) {
            if let Some(hl_title) = find_from(&text, HL_TITLE_MARKER, hl_body) {
                text.replace_range(hl_body..hl_title, "");
            }
        }

        cursor = start + 1;
    }

    if text == body {
        Cow::Borrowed(body)
    } else {
        Cow::Owned(text)
    }
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|offset| from + offset)
}
