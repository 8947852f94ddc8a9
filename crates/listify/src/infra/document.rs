//! In-memory paragraph document acting as a document host.

use std::ops::Range;

use serde::Serialize;

use crate::app::host::{DocumentHost, HostError};
use crate::domain::model::{InsertLocation, LineRange, ListId, ParagraphId};

/// Separator placed between paragraphs when the selection is read back.
pub const PARAGRAPH_SEPARATOR: &str = "\r";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub id: ParagraphId,
    pub text: String,
    pub list: Option<ListId>,
}

/// Paragraphs grouped for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    List { items: Vec<String> },
}

/// Plain-text document with a paragraph-range selection.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    paragraphs: Vec<Paragraph>,
    selection: Range<usize>,
    next_paragraph: u64,
    next_list: u64,
}

impl TextDocument {
    /// Build a document with one paragraph per line and everything selected.
    pub fn from_text(text: &str) -> Self {
        let mut document = Self::default();
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        for line in unified.lines() {
            let paragraph = document.new_paragraph(line, None);
            document.paragraphs.push(paragraph);
        }
        document.select_all();
        document
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.paragraphs.len();
    }

    /// Select a 1-based inclusive range of lines, clamped to the document.
    pub fn select_lines(&mut self, range: LineRange) {
        let len = self.paragraphs.len();
        let start = range.start().saturating_sub(1).min(len);
        let end = range.end().min(len).max(start);
        self.selection = start..end;
    }

    /// Group paragraphs into plain paragraphs and runs of list items.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut current: Option<(ListId, Vec<String>)> = None;

        for paragraph in &self.paragraphs {
            if let (Some(list), Some((open, items))) = (paragraph.list, current.as_mut())
                && *open == list
            {
                items.push(paragraph.text.clone());
                continue;
            }

            if let Some((_, items)) = current.take() {
                blocks.push(Block::List { items });
            }
            match paragraph.list {
                Some(list) => current = Some((list, vec![paragraph.text.clone()])),
                None => blocks.push(Block::Paragraph {
                    text: paragraph.text.clone(),
                }),
            }
        }

        if let Some((_, items)) = current {
            blocks.push(Block::List { items });
        }
        blocks
    }

    fn new_paragraph(&mut self, text: &str, list: Option<ListId>) -> Paragraph {
        self.next_paragraph += 1;
        Paragraph {
            id: ParagraphId(self.next_paragraph),
            text: text.to_owned(),
            list,
        }
    }

    fn insert_at(&mut self, index: usize, paragraph: Paragraph) {
        self.paragraphs.insert(index, paragraph);
        if index <= self.selection.start {
            self.selection.start += 1;
            self.selection.end += 1;
        } else if index < self.selection.end {
            self.selection.end += 1;
        }
    }

    fn position_of(&self, id: ParagraphId) -> Option<usize> {
        self.paragraphs.iter().position(|paragraph| paragraph.id == id)
    }
}

impl DocumentHost for TextDocument {
    async fn selection_text(&mut self) -> Result<String, HostError> {
        let selected: Vec<&str> = self.paragraphs[self.selection.clone()]
            .iter()
            .map(|paragraph| paragraph.text.as_str())
            .collect();
        Ok(selected.join(PARAGRAPH_SEPARATOR))
    }

    async fn insert_paragraph(
        &mut self,
        text: &str,
        location: InsertLocation,
    ) -> Result<ParagraphId, HostError> {
        let paragraph = self.new_paragraph(text, None);
        let id = paragraph.id;
        match location {
            InsertLocation::Replace => {
                let start = self.selection.start;
                self.paragraphs.drain(self.selection.clone());
                self.paragraphs.insert(start, paragraph);
                self.selection = start..start + 1;
            }
            InsertLocation::Before => self.insert_at(self.selection.start, paragraph),
            InsertLocation::After => self.insert_at(self.selection.end, paragraph),
            InsertLocation::Start => self.insert_at(0, paragraph),
            InsertLocation::End => self.insert_at(self.paragraphs.len(), paragraph),
        }
        tracing::debug!(paragraph = id.0, ?location, "inserted paragraph");
        Ok(id)
    }

    async fn start_list(&mut self, paragraph: ParagraphId) -> Result<ListId, HostError> {
        let index = self.position_of(paragraph).ok_or_else(|| {
            HostError::operation(format!("paragraph {} not found", paragraph.0))
        })?;
        self.next_list += 1;
        let list = ListId(self.next_list);
        self.paragraphs[index].list = Some(list);
        Ok(list)
    }

    async fn insert_list_item(&mut self, list: ListId, text: &str) -> Result<(), HostError> {
        let last = self
            .paragraphs
            .iter()
            .rposition(|paragraph| paragraph.list == Some(list))
            .ok_or_else(|| HostError::operation(format!("list {} not found", list.0)))?;
        let paragraph = self.new_paragraph(text, Some(list));
        self.insert_at(last + 1, paragraph);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::executor::block_on;

    fn texts(document: &TextDocument) -> Vec<&str> {
        document
            .paragraphs()
            .iter()
            .map(|paragraph| paragraph.text.as_str())
            .collect()
    }

    #[test]
    fn from_text_splits_every_line_ending() {
        let document = TextDocument::from_text("one\r\ntwo\rthree\nfour\n");
        assert_eq!(texts(&document), ["one", "two", "three", "four"]);
        assert_eq!(document.selection(), 0..4);
    }

    #[test]
    fn selection_text_joins_with_paragraph_separator() {
        let mut document = TextDocument::from_text("a\nb\nc");
        document.select_lines(LineRange::new(2, 3).unwrap());
        let text = block_on(document.selection_text()).unwrap();
        assert_eq!(text, "b\rc");
    }

    #[test]
    fn select_lines_clamps_to_document() {
        let mut document = TextDocument::from_text("a\nb");
        document.select_lines(LineRange::new(2, 10).unwrap());
        assert_eq!(document.selection(), 1..2);

        document.select_lines(LineRange::new(5, 6).unwrap());
        assert_eq!(document.selection(), 2..2);
        assert_eq!(block_on(document.selection_text()).unwrap(), "");
    }

    #[test]
    fn select_lines_from_the_first_line() {
        let mut document = TextDocument::from_text("a\nb\nc");
        document.select_lines(LineRange::new(1, 1).unwrap());
        assert_eq!(document.selection(), 0..1);
        assert_eq!(block_on(document.selection_text()).unwrap(), "a");
    }

    #[test]
    fn replace_swaps_selection_for_single_paragraph() {
        let mut document = TextDocument::from_text("keep\nx\ny\nkeep too");
        document.select_lines(LineRange::new(2, 3).unwrap());

        let id = block_on(document.insert_paragraph("new", InsertLocation::Replace)).unwrap();

        assert_eq!(texts(&document), ["keep", "new", "keep too"]);
        assert_eq!(document.selection(), 1..2);
        assert_eq!(document.paragraphs()[1].id, id);
    }

    #[test]
    fn before_and_after_insert_around_selection() {
        let mut document = TextDocument::from_text("a\nb\nc");
        document.select_lines(LineRange::new(2, 2).unwrap());

        block_on(document.insert_paragraph("before", InsertLocation::Before)).unwrap();
        block_on(document.insert_paragraph("after", InsertLocation::After)).unwrap();
        block_on(document.insert_paragraph("first", InsertLocation::Start)).unwrap();
        block_on(document.insert_paragraph("last", InsertLocation::End)).unwrap();

        assert_eq!(
            texts(&document),
            ["first", "a", "before", "b", "after", "c", "last"]
        );
        assert_eq!(block_on(document.selection_text()).unwrap(), "b");
    }

    #[test]
    fn list_items_follow_the_last_item_of_their_list() {
        let mut document = TextDocument::from_text("intro\nselected\noutro");
        document.select_lines(LineRange::new(2, 2).unwrap());

        let first = block_on(document.insert_paragraph("one", InsertLocation::Replace)).unwrap();
        let list = block_on(document.start_list(first)).unwrap();
        block_on(document.insert_list_item(list, "two")).unwrap();
        block_on(document.insert_list_item(list, "three")).unwrap();

        assert_eq!(
            document.blocks(),
            vec![
                Block::Paragraph {
                    text: "intro".into()
                },
                Block::List {
                    items: vec!["one".into(), "two".into(), "three".into()]
                },
                Block::Paragraph {
                    text: "outro".into()
                },
            ]
        );
    }

    #[test]
    fn unknown_handles_are_host_errors() {
        let mut document = TextDocument::from_text("a");
        assert_eq!(
            block_on(document.start_list(ParagraphId(99))),
            Err(HostError::operation("paragraph 99 not found"))
        );
        assert_eq!(
            block_on(document.insert_list_item(ListId(4), "x")),
            Err(HostError::operation("list 4 not found"))
        );
    }
}
