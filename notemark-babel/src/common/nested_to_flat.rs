//! Flattens an owned list-item tree into depth-annotated lines.
//!
//! # The High-Level Concept
//!
//! Serializing a list is a pre-order walk: each item is emitted before its
//! children, and each nesting level adds one indentation step. The walk also
//! counts siblings so ordered lists can number every sibling group from 1.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Create an empty line vector
//!    - Begin at the top-level items with depth 0
//!
//! 2. **For each item:**
//!    - Emit a line with the current depth and the item's 1-based position
//!      among its siblings
//!    - Recurse into its children with depth + 1
//!
//! 3. **Completion:**
//!    - Return the lines in document order
//!
//! This is the inverse of `flat_to_nested`: indenting each line by
//! `depth * width` for any width > 0 and folding it back yields the same tree.

use crate::ir::nodes::ListItem;

/// One rendered list line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatLine<'a> {
    pub depth: usize,
    /// 1-based position within the sibling group.
    pub index: usize,
    pub item: &'a ListItem,
}

/// Walks the tree depth-first and returns one line per item.
pub fn tree_to_lines(items: &[ListItem]) -> Vec<FlatLine<'_>> {
    let mut lines = Vec::new();
    walk(items, 0, &mut lines);
    lines
}

fn walk<'a>(items: &'a [ListItem], depth: usize, lines: &mut Vec<FlatLine<'a>>) {
    for (position, item) in items.iter().enumerate() {
        lines.push(FlatLine {
            depth,
            index: position + 1,
            item,
        });
        walk(&item.items, depth + 1, lines);
    }
}
