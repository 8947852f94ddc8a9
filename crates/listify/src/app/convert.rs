//! Selection-to-bulleted-list conversion flow.

use thiserror::Error;

use crate::app::host::{DocumentHost, HostError};
use crate::domain::model::{InsertLocation, StatusMessage};
use crate::domain::parser;

pub const NO_ITEMS_MESSAGE: &str = "No items found in the selection.";

/// Surface the flow reports progress to.
pub trait UiSurface {
    /// Toggle the busy indicator (disabled trigger, spinner, ...).
    fn set_busy(&mut self, busy: bool);

    /// Show a status message to the user.
    fn report(&mut self, status: StatusMessage);
}

/// Reasons a conversion did not modify the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("no items found in the selection")]
    NoItems,
    #[error("document host failure: {0}")]
    Host(#[from] HostError),
}

/// Summary of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub items: Vec<String>,
}

impl ConversionReport {
    pub fn inserted(&self) -> usize {
        self.items.len()
    }
}

/// Replace the host's current selection with a bulleted list of its items.
///
/// Reports exactly one terminal status to `ui` and always clears the busy
/// indicator before returning.
pub async fn convert_selection<H, U>(
    host: &mut H,
    ui: &mut U,
) -> Result<ConversionReport, ConvertError>
where
    H: DocumentHost,
    U: UiSurface,
{
    ui.set_busy(true);
    ui.report(StatusMessage::info("Converting selection..."));

    let outcome = run(host).await;

    match &outcome {
        Ok(report) => {
            tracing::info!(items = report.inserted(), "selection converted");
            ui.report(StatusMessage::success(success_message(report.inserted())));
        }
        Err(ConvertError::NoItems) => {
            tracing::info!("selection produced no items");
            ui.report(StatusMessage::error(NO_ITEMS_MESSAGE));
        }
        Err(ConvertError::Host(err)) => {
            tracing::error!(error = %err, "document host failed during conversion");
            ui.report(StatusMessage::error(format!(
                "Failed to convert selection: {err}"
            )));
        }
    }

    ui.set_busy(false);
    outcome
}

async fn run<H: DocumentHost>(host: &mut H) -> Result<ConversionReport, ConvertError> {
    let selection = host.selection_text().await?;
    if selection.trim().is_empty() {
        return Err(ConvertError::NoItems);
    }

    let items = parser::parse(&selection);
    let Some((first, rest)) = items.split_first() else {
        return Err(ConvertError::NoItems);
    };

    let paragraph = host.insert_paragraph(first, InsertLocation::Replace).await?;
    let list = host.start_list(paragraph).await?;
    for item in rest {
        host.insert_list_item(list, item).await?;
    }

    Ok(ConversionReport {
        items: items.into_vec(),
    })
}

fn success_message(count: usize) -> String {
    if count == 1 {
        "Inserted 1 bullet item.".to_owned()
    } else {
        format!("Inserted {count} bullet items.")
    }
}
