//! Markdown → block document

use crate::common::blocks;
use notemark_babel::ir::inline::{Inline, LinkedRef, RichText};
use notemark_babel::ir::nodes::{
    Block, Callout, CalloutKind, Code, Diagram, Heading, List, ListItem, ListStyle, Quote, Raw,
    Table,
};
use notemark_babel::{parse_with_options, CodecOptions};
use pretty_assertions::assert_eq;

fn kinds(markdown: &str) -> Vec<String> {
    blocks(markdown)
        .iter()
        .map(|block| block.kind().to_string())
        .collect()
}

#[test]
fn test_kitchensink_block_kinds() {
    let md = include_str!("fixtures/kitchensink.md");
    assert_eq!(
        kinds(md),
        vec![
            "heading",
            "paragraph",
            "heading",
            "list",
            "list",
            "list",
            "heading",
            "quote",
            "callout",
            "heading",
            "table",
            "heading",
            "code",
            "diagram",
            "thematic_break",
            "raw",
        ]
    );
}

#[test]
fn test_crlf_is_normalized() {
    assert_eq!(blocks("# A\r\n\r\nb\rc"), blocks("# A\n\nb\nc"));
}

#[test]
fn test_heading_content_is_inline_parsed() {
    assert_eq!(
        blocks("### A **bold** [[page]]"),
        vec![Block::Heading(Heading {
            level: 3,
            content: RichText::new(vec![
                Inline::Text("A ".into()),
                Inline::Bold(vec![Inline::Text("bold".into())]),
                Inline::Text(" ".into()),
                Inline::LinkedRef(LinkedRef::new("page", None)),
            ]),
        })]
    );
}

#[test]
fn test_paragraph_stops_at_block_start() {
    assert_eq!(
        kinds("one\ntwo\n# three\nfour\n- five"),
        vec!["paragraph", "heading", "paragraph", "list"]
    );
}

#[test]
fn test_paragraph_keeps_internal_line_breaks() {
    assert_eq!(
        blocks("first\n  second"),
        vec![Block::paragraph(RichText::new(vec![
            Inline::Text("first".into()),
            Inline::LineBreak,
            Inline::Text("second".into()),
        ]))]
    );
}

#[test]
fn test_quote_keeps_nested_markers_literal() {
    assert_eq!(
        blocks("> outer\n>> inner\n> > spaced"),
        vec![Block::Quote(Quote {
            text: "outer\n> inner\n> spaced".into()
        })]
    );
}

#[test]
fn test_callout_marker_recognition() {
    assert_eq!(
        blocks("> [!WARNING]\n> message line"),
        vec![Block::Callout(Callout {
            kind: CalloutKind::Warning,
            message: RichText::from("message line"),
        })]
    );
}

#[test]
fn test_callout_tokens_normalize() {
    let kind_of = |md: &str| match blocks(md).pop() {
        Some(Block::Callout(callout)) => callout.kind,
        other => panic!("expected callout, got {other:?}"),
    };
    assert_eq!(kind_of("> [!tip]\n> x"), CalloutKind::Tip);
    assert_eq!(kind_of("> [!hint]\n> x"), CalloutKind::Tip);
    assert_eq!(kind_of("> [!danger]\n> x"), CalloutKind::Caution);
    assert_eq!(kind_of("> [!whatever]\n> x"), CalloutKind::Note);
}

#[test]
fn test_callout_lead_text_opens_message() {
    assert_eq!(
        blocks("> [!NOTE] Heads up\n> details"),
        vec![Block::Callout(Callout {
            kind: CalloutKind::Note,
            message: RichText::new(vec![
                Inline::Text("Heads up".into()),
                Inline::LineBreak,
                Inline::Text("details".into()),
            ]),
        })]
    );
}

#[test]
fn test_fence_language_and_body() {
    assert_eq!(
        blocks("```python\nprint('hi')\n\n# not a heading\n```"),
        vec![Block::Code(Code {
            language: "python".into(),
            code: "print('hi')\n\n# not a heading".into(),
        })]
    );
}

#[test]
fn test_unterminated_fence_runs_to_end() {
    assert_eq!(
        blocks("```\nopen\nforever"),
        vec![Block::Code(Code {
            language: String::new(),
            code: "open\nforever".into(),
        })]
    );
}

#[test]
fn test_configured_diagram_language() {
    let options = CodecOptions::new("plantuml", 2);
    let doc = parse_with_options("```plantuml\n@startuml\n```\n\n```mermaid\nx\n```", &options);
    let blocks: Vec<&Block> = doc.iter_blocks().collect();
    assert_eq!(
        blocks[0],
        &Block::Diagram(Diagram {
            source: "@startuml".into()
        })
    );
    assert_eq!(blocks[1].kind(), "code");
}

#[test]
fn test_table_with_headings() {
    assert_eq!(
        blocks("| A | B |\n| :--- | ---: |\n| 1 | 2 |"),
        vec![Block::Table(Table {
            with_headings: true,
            content: vec![
                vec!["A".into(), "B".into()],
                vec!["1".into(), "2".into()],
            ],
        })]
    );
}

#[test]
fn test_table_with_blank_header_has_no_headings() {
    assert_eq!(
        blocks("|  |  |\n| --- | --- |\n| 1 | 2 |"),
        vec![Block::Table(Table {
            with_headings: false,
            content: vec![vec!["1".into(), "2".into()]],
        })]
    );
}

#[test]
fn test_pipe_line_without_separator_is_raw() {
    assert_eq!(
        blocks("| just | pipes |"),
        vec![Block::Raw(Raw {
            html: "| just | pipes |".into()
        })]
    );
}

#[test]
fn test_html_block_passes_through() {
    assert_eq!(
        blocks("<details>\n<summary>More</summary>\n</details>\n\nafter"),
        vec![
            Block::raw("<details>\n<summary>More</summary>\n</details>"),
            Block::paragraph(RichText::from("after")),
        ]
    );
}

#[test]
fn test_checklist_items() {
    assert_eq!(
        blocks("- [ ] open\n- [X] closed"),
        vec![Block::List(List {
            style: ListStyle::Checklist,
            items: vec![
                ListItem::new(RichText::from("open")).with_checked(false),
                ListItem::new(RichText::from("closed")).with_checked(true),
            ],
        })]
    );
}

#[test]
fn test_marker_family_change_splits_lists() {
    assert_eq!(
        kinds("- a\n- b\n1. c\n2. d\n- [ ] e"),
        vec!["list", "list", "list"]
    );
}
