//! Folds indentation-annotated list lines into an owned item tree.
//!
//! # The High-Level Concept
//!
//! The scanner reads list lines one at a time and only knows each line's
//! leading-space count. Nesting is recovered afterwards from indentation
//! deltas: a line becomes a child of the nearest preceding line that is
//! strictly shallower than it. Only the relative order of indents matters,
//! so a list indented with two spaces per level and one indented with four
//! produce the same tree.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Create an empty root vector and an empty stack of open items
//!
//! 2. **For each flat line:**
//!    - Close every open item whose indent is greater than or equal to the
//!      line's indent: pop it and append it to the new stack top's children,
//!      or to the roots when the stack is empty
//!    - Push the line's item as the new open item
//!
//! 3. **Completion:**
//!    - Close everything left on the stack the same way
//!    - The root vector holds the top-level items in source order
//!
//! A first line that is deeper than later ones is not an error: later,
//! shallower lines simply become its siblings at the root.

use crate::ir::nodes::ListItem;

/// One list line as seen by the scanner: its leading-space count and the
/// (childless) item it introduces.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatItem {
    pub indent: usize,
    pub item: ListItem,
}

impl FlatItem {
    pub fn new(indent: usize, item: ListItem) -> Self {
        Self { indent, item }
    }
}

/// Builds the item tree from flat lines.
pub fn lines_to_tree<I>(lines: I) -> Vec<ListItem>
where
    I: IntoIterator<Item = FlatItem>,
{
    let mut roots = Vec::new();
    let mut stack: Vec<FlatItem> = Vec::new();

    for line in lines {
        while stack.last().is_some_and(|open| open.indent >= line.indent) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(line);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

fn close_top(stack: &mut Vec<FlatItem>, roots: &mut Vec<ListItem>) {
    let Some(closed) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.item.items.push(closed.item),
        None => roots.push(closed.item),
    }
}
