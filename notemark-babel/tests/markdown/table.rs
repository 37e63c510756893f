//! Table cell model through the text boundary

use crate::common::{assert_canonical, blocks, round_trip};
use notemark_babel::ir::inline::{Inline, LinkedRef, RichText};
use notemark_babel::ir::nodes::{Block, Table};
use pretty_assertions::assert_eq;

fn table(markdown: &str) -> Table {
    match blocks(markdown).pop() {
        Some(Block::Table(table)) => table,
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn test_rows_are_rectangular() {
    let parsed = table("| a | b | c |\n| --- | --- | --- |\n| 1 | 2 |\n| x |");
    assert!(parsed.content.iter().all(|row| row.len() == 3));
    assert_eq!(parsed.content[2], vec!["x", "", ""]);
}

#[test]
fn test_short_rows_serialize_padded() {
    assert_eq!(
        round_trip("| a | b | c |\n| --- | --- | --- |\n| 1 | 2 |\n| x |"),
        "| a | b | c |\n| --- | --- | --- |\n| 1 | 2 |  |\n| x |  |  |\n"
    );
}

#[test]
fn test_escaped_pipes_and_breaks_round_trip() {
    let md = "| code | note |\n| --- | --- |\n| a\\|b | one<br>two |\n";
    let parsed = table(md);
    assert_eq!(parsed.content[1], vec!["a|b", "one\ntwo"]);
    assert_canonical(md);
}

#[test]
fn test_break_marker_is_case_insensitive() {
    let parsed = table("| x |\n| --- |\n| a<BR/>b |");
    assert_eq!(parsed.content[1], vec!["a\nb"]);
}

#[test]
fn test_headerless_table_round_trip() {
    assert_canonical("|  |  |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |\n");
}

#[test]
fn test_rich_cells_run_the_inline_engine() {
    let parsed = table("| **b** | [[x]] |\n| --- | --- |");
    assert_eq!(
        parsed.rich_cells()[0],
        vec![
            RichText::new(vec![Inline::Bold(vec![Inline::Text("b".into())])]),
            RichText::new(vec![Inline::LinkedRef(LinkedRef::new("x", None))]),
        ]
    );
}

#[test]
fn test_table_ends_at_non_row() {
    assert_eq!(
        blocks("| a |\n| --- |\n| 1 |\nafter")
            .iter()
            .map(Block::kind)
            .collect::<Vec<_>>(),
        vec!["table", "paragraph"]
    );
}
