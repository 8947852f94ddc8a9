use futures::executor::block_on;
use insta::assert_snapshot;

use listify::app::convert::{ConvertError, convert_selection};
use listify::app::render::{RenderFormat, RenderOptions, Renderer};
use listify::domain::model::{LineRange, Severity};
use listify::infra::config::Config;
use listify::infra::document::{Block, TextDocument};
use listify::ui::status::ConsoleStatus;

fn render(document: &TextDocument, format: RenderFormat) -> String {
    let mut options = RenderOptions::from_config(&Config::default());
    options.format = format;
    Renderer::new()
        .expect("renderer")
        .render(&document.blocks(), &options)
        .expect("render document")
}

#[test]
fn converts_selected_lines_into_markdown_list() {
    let mut document = TextDocument::from_text(
        "Meeting notes\n1) Agree budget\n2) Hire designer\n(3) Ship beta\nNext sync Friday\n",
    );
    document.select_lines(LineRange::new(2, 4).unwrap());
    let mut status = ConsoleStatus::new(Vec::new(), true);

    let report = block_on(convert_selection(&mut document, &mut status)).expect("converted");

    assert_eq!(report.inserted(), 3);
    assert_eq!(status.last().map(|s| s.severity), Some(Severity::Success));
    assert!(!status.is_busy());
    let rendered = render(&document, RenderFormat::Markdown);
    assert_snapshot!(rendered.trim_end(), @r"
Meeting notes
- Agree budget
- Hire designer
- Ship beta
Next sync Friday
");
}

#[test]
fn literal_escapes_in_a_single_paragraph_become_items() {
    let mut document = TextDocument::from_text(r"first\nsecond\r\nthird");
    let mut status = ConsoleStatus::new(Vec::new(), false);

    block_on(convert_selection(&mut document, &mut status)).expect("converted");

    assert_eq!(
        document.blocks(),
        vec![Block::List {
            items: vec!["first".into(), "second".into(), "third".into()]
        }]
    );
    let rendered = render(&document, RenderFormat::Plain);
    assert_snapshot!(rendered.trim_end(), @r"
• first
• second
• third
");
}

#[test]
fn commas_inside_lines_survive_when_lines_exist() {
    let mut document = TextDocument::from_text("Smith, John\nDoe, Jane");
    let mut status = ConsoleStatus::new(Vec::new(), false);

    let report = block_on(convert_selection(&mut document, &mut status)).expect("converted");

    assert_eq!(report.items, ["Smith, John", "Doe, Jane"]);
}

#[test]
fn blank_selection_leaves_document_untouched() {
    let mut document = TextDocument::from_text("keep me\n\n   \n");
    document.select_lines(LineRange::new(2, 3).unwrap());
    let before = document.paragraphs().to_vec();
    let mut status = ConsoleStatus::new(Vec::new(), false);

    let result = block_on(convert_selection(&mut document, &mut status));

    assert_eq!(result, Err(ConvertError::NoItems));
    assert_eq!(document.paragraphs(), before.as_slice());
    let output = String::from_utf8(status.into_inner()).unwrap();
    assert!(output.contains("[error] No items found in the selection."));
}
