//! Domain models for parsed items, document handles, and status reporting.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::errors::DomainError;

/// Ordered list of cleaned items extracted from a selection.
///
/// Every entry is non-empty and trimmed; order follows the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemList(Vec<String>);

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, ignoring entries that are blank once trimmed.
    pub fn push(&mut self, item: impl AsRef<str>) {
        let trimmed = item.as_ref().trim();
        if !trimmed.is_empty() {
            self.0.push(trimmed.to_owned());
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for ItemList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for ItemList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ItemList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ItemList::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}

/// Handle to a paragraph owned by a document host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParagraphId(pub u64);

/// Handle to a bulleted list owned by a document host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(pub u64);

/// Where a paragraph is inserted relative to the current selection or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertLocation {
    /// Replace the selected content.
    Replace,
    /// Directly before the selection.
    Before,
    /// Directly after the selection.
    After,
    /// Start of the document.
    Start,
    /// End of the document.
    End,
}

/// Severity attached to a user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Error => "error",
        }
    }
}

/// Human-readable status reported to the UI surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.label(), self.text)
    }
}

/// Inclusive, 1-based range of lines used to select part of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Result<Self, DomainError> {
        if start == 0 || start > end {
            return Err(DomainError::EmptyLineRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First selected line, always at least 1.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last selected line, never before `start`.
    pub fn end(&self) -> usize {
        self.end
    }
}

impl FromStr for LineRange {
    type Err = DomainError;

    /// Accepts `START-END` or a single line number.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::MalformedLineRange(value.to_owned());
        let value_trimmed = value.trim();
        let (start, end) = match value_trimmed.split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (value_trimmed, value_trimmed),
        };
        let start: usize = start.parse().map_err(|_| malformed())?;
        let end: usize = end.parse().map_err(|_| malformed())?;
        LineRange::new(start, end)
    }
}
