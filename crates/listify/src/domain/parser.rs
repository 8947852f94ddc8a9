//! Selection parser turning messy selected text into clean list items.
//!
//! Selections arrive in many shapes: real line breaks of every flavour, escape
//! sequences that survived as literal text, or a single line separated by
//! commas or backslashes. Each segment may also carry a bullet or numbering
//! prefix that should not end up in the item text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::model::ItemList;

/// Canonical line-break marker used after normalization.
pub const LINE_BREAK: char = '\n';

static LITERAL_ESCAPES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\r\\n|\\r|\\n").expect("valid literal escape pattern"));

static REAL_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|[\r\u{2028}\u{2029}]").expect("valid line break pattern"));

static LIST_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[•\-*]|\([0-9]+\)|[0-9]+[.)])\s*").expect("valid prefix pattern")
});

/// Parse a raw selection into an ordered list of items.
///
/// Never fails: blank input yields an empty list, and segments that are empty
/// after trimming are dropped. Comma and backslash only act as separators when
/// the normalized text holds no line break at all.
pub fn parse(selection: &str) -> ItemList {
    if selection.trim().is_empty() {
        return ItemList::new();
    }

    let normalized = normalize_line_breaks(selection);
    let delimited = !normalized.contains(LINE_BREAK)
        && normalized.contains(|c: char| matches!(c, '\\' | ','));

    tracing::debug!(
        delimited,
        chars = normalized.chars().count(),
        "splitting selection"
    );

    let segments: Vec<&str> = if delimited {
        normalized
            .split(|c: char| matches!(c, '\\' | ','))
            .collect()
    } else {
        normalized.split(LINE_BREAK).collect()
    };

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(strip_prefix)
        .collect()
}

/// Rewrite literal `\r`/`\n` escapes and every real line-break flavour
/// (CRLF, CR, U+2028, U+2029) into [`LINE_BREAK`].
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    match LITERAL_ESCAPES.replace_all(text, "\n") {
        Cow::Borrowed(borrowed) => REAL_BREAKS.replace_all(borrowed, "\n"),
        Cow::Owned(owned) => Cow::Owned(REAL_BREAKS.replace_all(&owned, "\n").into_owned()),
    }
}

/// Remove a single leading bullet or numbering prefix and trim the rest.
pub fn strip_prefix(segment: &str) -> &str {
    let trimmed = segment.trim();
    match LIST_PREFIX.find(trimmed) {
        Some(prefix) => trimmed[prefix.end()..].trim(),
        None => trimmed,
    }
}
