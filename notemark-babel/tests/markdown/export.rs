//! Block document → markdown

use insta::assert_snapshot;
use notemark_babel::ir::inline::{Inline, LinkedRef, RichText};
use notemark_babel::ir::nodes::{
    Block, BlockRecord, Callout, CalloutKind, Document, List, ListItem, ListStyle, Table,
};
use notemark_babel::{serialize, serialize_with_options, CodecOptions};
use serde_json::json;

fn render(blocks: Vec<Block>) -> String {
    serialize(&Document::from_blocks(blocks))
}

fn text(s: &str) -> Inline {
    Inline::Text(s.to_string())
}

#[test]
fn test_export_mixed_document() {
    let doc = Document::new(vec![
        BlockRecord::new(Block::heading(1, RichText::from("Plan"))).with_id("h"),
        BlockRecord::new(Block::paragraph(RichText::new(vec![
            text("Ship "),
            Inline::Bold(vec![text("today")]),
            text(", see "),
            Inline::LinkedRef(LinkedRef::new("Roadmap", Some("the roadmap".into()))),
            text("."),
        ]))),
        BlockRecord::new(Block::Callout(Callout {
            kind: CalloutKind::Important,
            message: RichText::new(vec![text("Two"), Inline::LineBreak, text("lines")]),
        })),
        BlockRecord::new(Block::ThematicBreak),
    ]);

    assert_snapshot!(serialize(&doc), @r"
    # Plan

    Ship **today**, see [[Roadmap|the roadmap]].

    > [!IMPORTANT]
    > Two
    > lines

    ---
    ");
}

#[test]
fn test_export_table_pads_to_widest_row() {
    let md = render(vec![Block::Table(Table {
        with_headings: true,
        content: vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["1".into(), "2".into()],
            vec!["x".into()],
        ],
    })]);
    assert_snapshot!(md, @r"
    | a | b | c |
    | --- | --- | --- |
    | 1 | 2 |  |
    | x |  |  |
    ");
}

#[test]
fn test_export_table_escapes_cells() {
    let md = render(vec![Block::Table(Table {
        with_headings: false,
        content: vec![vec!["a|b".into(), "two\nlines".into()]],
    })]);
    assert_snapshot!(md, @r"
    |  |  |
    | --- | --- |
    | a\|b | two<br>lines |
    ");
}

#[test]
fn test_export_nested_ordered_list_restarts_numbering() {
    let md = render(vec![Block::List(List {
        style: ListStyle::Ordered,
        items: vec![
            ListItem::new(RichText::from("a")).with_children(vec![
                ListItem::new(RichText::from("a1")),
                ListItem::new(RichText::from("a2")),
            ]),
            ListItem::new(RichText::from("b")),
        ],
    })]);
    assert_snapshot!(md, @r"
    1. a
      1. a1
      2. a2
    2. b
    ");
}

#[test]
fn test_export_list_indent_option() {
    let doc = Document::from_blocks(vec![Block::List(List {
        style: ListStyle::Checklist,
        items: vec![ListItem::new(RichText::from("top"))
            .with_checked(true)
            .with_children(vec![ListItem::new(RichText::from("sub"))])],
    })]);
    assert_eq!(
        serialize_with_options(&doc, &CodecOptions::new("mermaid", 4)),
        "- [x] top\n    - [ ] sub\n"
    );
}

#[test]
fn test_export_diagram_forces_language() {
    let md = serialize_with_options(
        &Document::from_blocks(vec![Block::diagram("a --> b")]),
        &CodecOptions::new("dot", 2),
    );
    assert_eq!(md, "```dot\na --> b\n```\n");
}

#[test]
fn test_export_code_fence_outgrows_content() {
    let md = render(vec![Block::code("md", "```\ninner\n```")]);
    assert_snapshot!(md, @r"
    ````md
    ```
    inner
    ```
    ````
    ");
}

#[test]
fn test_export_unknown_block_is_dumped() {
    let doc: Document = serde_json::from_value(json!({
        "blocks": [{"type": "embed", "data": {"url": "https://example.com"}}]
    }))
    .unwrap();
    assert_snapshot!(serialize(&doc), @r#"
    ```json
    {
      "data": {
        "url": "https://example.com"
      },
      "type": "embed"
    }
    ```
    "#);
}

#[test]
fn test_export_escapes_block_lookalikes_in_paragraphs() {
    let md = render(vec![Block::paragraph(RichText::new(vec![
        text("# not heading"),
        Inline::LineBreak,
        text("- not list"),
        Inline::LineBreak,
        text("1. not ordered"),
        Inline::LineBreak,
        text("> not quote"),
    ]))]);
    assert_snapshot!(md, @r"
    \# not heading
    \- not list
    1\. not ordered
    \> not quote
    ");
}

#[test]
fn test_export_empty_blocks_never_vanish_into_nothing() {
    assert_eq!(render(vec![Block::heading(2, RichText::default())]), "## \n");
    assert_eq!(
        render(vec![Block::List(List {
            style: ListStyle::Unordered,
            items: vec![],
        })]),
        "- \n"
    );
}
