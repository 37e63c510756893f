//! parse → serialize → parse stability

use crate::common::{assert_canonical, blocks, options, round_trip};
use notemark_babel::ir::nodes::{List, ListItem, ListStyle};
use notemark_babel::{
    html_to_markdown, normalize, parse, serialize, Block, Document, Inline, RichText,
};
use pretty_assertions::assert_eq;

#[test]
fn test_kitchensink_is_canonical() {
    assert_canonical(include_str!("fixtures/kitchensink.md"));
}

#[test]
fn test_serialized_output_reparses_to_same_blocks() {
    let md = include_str!("fixtures/kitchensink.md");
    let once = parse(md);
    let again = parse(&serialize(&once));
    assert_eq!(again, once);
}

#[test]
fn test_loose_input_normalizes_once() {
    let loose = "Title\n=====\n\n*   star bullet\n+   plus bullet\n\n\n\n***\n\n>quote without space\n";
    let canonical = normalize(loose, &options());
    assert_eq!(normalize(&canonical, &options()), canonical);
}

#[test]
fn test_literal_syntax_in_text_survives() {
    for md in [
        "2 \\* 3 \\* 4\n",
        "a_b\\_ c\n",
        "\\[not a link\\](x)\n",
        "\\# not a heading\n",
        "\\- not a list\n",
        "10\\. not ordered\n",
        "\\> not a quote\n",
        "\\<not html>\n",
        "path\\to\\file\n",
    ] {
        assert_canonical(md);
    }
}

#[test]
fn test_unsafe_markdown_link_is_kept_as_text() {
    let out = round_trip("[click](javascript:alert(1))");
    assert_eq!(out, "\\[click\\](javascript:alert(1))\n");
    assert_eq!(round_trip(&out), out);
}

#[test]
fn test_linked_ref_alias_suppression() {
    assert_eq!(round_trip("[[page|page]] [[#intro|intro]]"), "[[page]] [[#intro]]\n");
    assert_canonical("[[page|Other]]\n");
}

#[test]
fn test_emphasis_edge_cases_are_stable() {
    for md in [
        "***both***",
        "**bold *and italic***",
        "*italic **and bold***",
        "~~**struck bold**~~",
        "`code with \\` tick`",
        "**unclosed",
        "a ** b ** c",
        "snake_case_word",
    ] {
        let once = round_trip(md);
        assert_eq!(round_trip(&once), once, "{md:?}");
    }
}

#[test]
fn test_code_block_containing_fences() {
    assert_canonical("````md\n```rust\nlet x = 1;\n```\n````\n");
}

#[test]
fn test_diagram_block_round_trip() {
    assert_canonical("```mermaid\nsequenceDiagram\n  A->>B: hi\n```\n");
}

#[test]
fn test_empty_document() {
    assert_eq!(round_trip(""), "\n");
    assert_eq!(round_trip("\n\n\n"), "\n");
}

#[test]
fn test_list_item_that_reads_as_a_rule() {
    let list = Block::List(List {
        style: ListStyle::Unordered,
        items: vec![
            ListItem::new(RichText::from("---")),
            ListItem::new(RichText::from("b")),
        ],
    });
    let md = serialize(&Document::from_blocks([list.clone()]));
    assert_eq!(md, "- \\---\n- b\n");
    assert_eq!(blocks(&md), vec![list]);
    assert_canonical(&md);
}

#[test]
fn test_paragraph_lines_shaped_like_a_table() {
    let md = round_trip("a \\|\n--- \\|");
    assert_eq!(md, "a |\n--- \\|\n");
    assert!(matches!(blocks(&md).as_slice(), [Block::Paragraph(_)]));
    assert_canonical(&md);
}

#[test]
fn test_pasted_href_with_unbalanced_paren() {
    let md = html_to_markdown(r#"<p><a href="https://example.com/a)b">x</a></p>"#);
    assert_eq!(md, "[x](https://example.com/a%29b)\n");
    let parsed = blocks(&md);
    let [Block::Paragraph(paragraph)] = parsed.as_slice() else {
        panic!("expected one paragraph in {md:?}");
    };
    assert_eq!(
        paragraph.content.nodes(),
        [Inline::Link {
            href: "https://example.com/a%29b".into(),
            children: vec![Inline::Text("x".into())],
        }]
    );
    assert_canonical(&md);
}

#[test]
fn test_code_span_ending_in_backslash() {
    assert_canonical("Path `` C:\\ `` here\n");
    let parsed = blocks("`` C:\\ ``");
    let [Block::Paragraph(paragraph)] = parsed.as_slice() else {
        panic!("expected one paragraph");
    };
    assert_eq!(paragraph.content.nodes(), [Inline::Code("C:\\".into())]);
}

#[test]
fn test_large_paragraphs_of_unmatched_delimiters() {
    for unit in ["*a ", "_a ", "[a ", "[[a ", "~~a "] {
        let md = unit.repeat(50_000);
        let once = round_trip(&md);
        assert_eq!(round_trip(&once), once, "{unit:?}");
        assert!(matches!(blocks(&md).as_slice(), [Block::Paragraph(_)]));
    }
}
