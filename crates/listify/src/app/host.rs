//! Capability interface over the document that owns the selection.

use thiserror::Error;

use crate::domain::model::{InsertLocation, ListId, ParagraphId};

/// Description used when a host failure carries no usable message.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred.";

/// Failure reported by a document host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host rejected or failed an operation and described why.
    #[error("{}", describe(.0))]
    Operation(String),
    /// The host failed without any description.
    #[error("{}", GENERIC_FAILURE)]
    Unknown,
}

impl HostError {
    pub fn operation(message: impl Into<String>) -> Self {
        HostError::Operation(message.into())
    }
}

fn describe(message: &str) -> &str {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        GENERIC_FAILURE
    } else {
        trimmed
    }
}

/// Document operations the conversion flow depends on.
///
/// Every call is a request/response round trip; callers await each one before
/// issuing the next so host-side ordering matches call order.
#[allow(async_fn_in_trait)]
pub trait DocumentHost {
    /// Text of the current selection. An empty string means nothing usable is selected.
    async fn selection_text(&mut self) -> Result<String, HostError>;

    /// Insert `text` as a new paragraph at `location`.
    async fn insert_paragraph(
        &mut self,
        text: &str,
        location: InsertLocation,
    ) -> Result<ParagraphId, HostError>;

    /// Turn `paragraph` into the first item of a new bulleted list.
    async fn start_list(&mut self, paragraph: ParagraphId) -> Result<ListId, HostError>;

    /// Append `text` as the last item of `list`.
    async fn insert_list_item(&mut self, list: ListId, text: &str) -> Result<(), HostError>;
}
