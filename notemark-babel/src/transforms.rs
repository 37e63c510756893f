//! Queries and whole-document transforms over the block document
//!
//! These are the structured-access helpers collaborators use instead of
//! re-reading markdown: the outline pane reads [`outline`], the graph index
//! reads [`linked_references`], and the editor's "format document" action
//! is [`normalize`].

use crate::formats::markdown::parser::parse_markdown;
use crate::formats::markdown::serializer::serialize_markdown;
use crate::ir::inline::LinkedRef;
use crate::ir::nodes::{Block, Document, ListItem};
use crate::options::CodecOptions;

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub level: u8,
    /// Display text of the heading.
    pub text: String,
}

/// The headings of a document, in order.
pub fn outline(doc: &Document) -> Vec<OutlineEntry> {
    doc.iter_blocks()
        .filter_map(|block| match block {
            Block::Heading(heading) => Some(OutlineEntry {
                level: heading.level,
                text: heading.content.plain_text(),
            }),
            _ => None,
        })
        .collect()
}

/// Every linked reference in document order.
///
/// Covers headings, paragraphs, callout messages, list items (depth-first)
/// and table cells (row-major). Quote, code and raw text is not inline
/// content and is not searched.
pub fn linked_references(doc: &Document) -> Vec<LinkedRef> {
    let mut refs = Vec::new();
    for block in doc.iter_blocks() {
        match block {
            Block::Heading(heading) => {
                refs.extend(heading.content.linked_refs().into_iter().cloned())
            }
            Block::Paragraph(paragraph) => {
                refs.extend(paragraph.content.linked_refs().into_iter().cloned())
            }
            Block::Callout(callout) => {
                refs.extend(callout.message.linked_refs().into_iter().cloned())
            }
            Block::List(list) => collect_item_refs(&list.items, &mut refs),
            Block::Table(table) => {
                for cell in table.rich_cells().iter().flatten() {
                    refs.extend(cell.linked_refs().into_iter().cloned());
                }
            }
            _ => {}
        }
    }
    refs
}

fn collect_item_refs(items: &[ListItem], refs: &mut Vec<LinkedRef>) {
    for item in items {
        refs.extend(item.content.linked_refs().into_iter().cloned());
        collect_item_refs(&item.items, refs);
    }
}

/// Parse and re-serialize: the canonical form of `markdown`.
///
/// Normalizing canonical text returns it unchanged.
pub fn normalize(markdown: &str, options: &CodecOptions) -> String {
    serialize_markdown(&parse_markdown(markdown, options), options)
}
