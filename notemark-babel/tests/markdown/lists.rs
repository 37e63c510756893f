//! Nested lists through the text boundary

use crate::common::{assert_canonical, blocks, round_trip};
use notemark_babel::ir::inline::RichText;
use notemark_babel::ir::nodes::{Block, List, ListItem, ListStyle};
use pretty_assertions::assert_eq;

fn item(text: &str) -> ListItem {
    ListItem::new(RichText::from(text))
}

fn nested_tree() -> List {
    List {
        style: ListStyle::Unordered,
        items: vec![
            item("a"),
            item("b").with_children(vec![
                item("nest1").with_children(vec![item("deep")]),
                item("nest2"),
            ]),
            item("c"),
        ],
    }
}

#[test]
fn test_nested_list_round_trip() {
    let md = "- a\n- b\n  - nest1\n    - deep\n  - nest2\n- c\n";
    assert_eq!(blocks(md), vec![Block::List(nested_tree())]);
    assert_canonical(md);
}

#[test]
fn test_any_indent_width_builds_the_same_tree() {
    for md in [
        "- a\n- b\n    - nest1\n        - deep\n    - nest2\n- c",
        "- a\n- b\n\t- nest1\n\t\t- deep\n\t- nest2\n- c",
        "- a\n- b\n - nest1\n  - deep\n - nest2\n- c",
    ] {
        assert_eq!(blocks(md), vec![Block::List(nested_tree())], "{md:?}");
    }
}

#[test]
fn test_dedent_to_unseen_level_attaches_to_nearest_ancestor() {
    let md = "- a\n    - b\n  - c";
    assert_eq!(
        blocks(md),
        vec![Block::List(List {
            style: ListStyle::Unordered,
            items: vec![item("a").with_children(vec![item("b"), item("c")])],
        })]
    );
}

#[test]
fn test_lazy_continuation_joins_previous_item() {
    assert_eq!(
        round_trip("- first line\n  continues here\n- second"),
        "- first line continues here\n- second\n"
    );
}

#[test]
fn test_ordered_numbers_are_renumbered() {
    assert_eq!(round_trip("3. c\n7. d\n1. e"), "1. c\n2. d\n3. e\n");
}

#[test]
fn test_checklist_round_trip_keeps_state() {
    assert_canonical("- [x] done\n  - [ ] sub one\n  - [x] sub two\n- [ ] open\n");
}

#[test]
fn test_plain_items_in_checklist_become_unchecked() {
    assert_eq!(round_trip("- [x] a\n  - b"), "- [x] a\n  - [ ] b\n");
}

#[test]
fn test_plain_top_level_item_after_checklist_starts_new_list() {
    assert_eq!(round_trip("- [x] a\n- b"), "- [x] a\n\n- b\n");
}

#[test]
fn test_list_item_inline_content() {
    assert_canonical("- **bold** item with [[link|Alias]]\n- `code` and [site](https://example.com)\n");
}
