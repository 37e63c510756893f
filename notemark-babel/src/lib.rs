//! Markdown ⇄ block document codec for the notemark editor
//!
//!     This crate converts the editor's markdown dialect into an ordered sequence of typed blocks
//!     and back into canonical markdown. It also converts clipboard HTML into the same dialect so
//!     that pasted content enters through the same parser as typed or loaded text.
//!
//!     TLDR:
//!         - parse() and serialize() are total: any text parses, any document serializes.
//!         - serialize(parse(serialize(doc))) == serialize(doc) for every document.
//!         - Every hyperlink target, typed or pasted, passes through sanitize_href().
//!
//! Architecture
//!
//!     The block document (./ir/mod.rs) is the only shared representation. Format specific code
//!     lives under ./formats, and helpers used by both directions of the markdown codec live
//!     under ./common: the table cell model and the list tree converters.
//!
//!     This is a pure lib: it never reads files, environment variables or configuration. Callers
//!     pass a CodecOptions value (see ./options.rs).
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── options.rs              # CodecOptions
//!     ├── transforms.rs           # outline, linked references, normalize
//!     ├── formats
//!     │   ├── markdown            # inline engine, block scanner, serializer
//!     │   ├── html                # clipboard HTML bridge (import only)
//!     │   └── json                # block-record JSON
//!     ├── ir                      # block document and rich text
//!     └── common                  # links, table cells, list tree conversion
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs mounts them.
//!
//! Core Algorithms
//!
//!     Lists are the only nested structure in the dialect. Markdown writes them as flat,
//!     indented lines; the editor wants an owned tree. ./common/flat_to_nested.rs folds lines
//!     into the tree with an indentation stack and ./common/nested_to_flat.rs walks it back out.
//!     Both are independent of the indentation width.
//!
//!     The inline engine (./formats/markdown/inline.rs) is a recursive scanner: it finds the
//!     earliest opening construct, its matching closer, and recurses into the span between them.
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod options;
pub mod registry;
pub mod transforms;

pub mod common;
pub mod ir;

pub use common::links::sanitize_href;
pub use error::FormatError;
pub use format::{Direction, Format};
pub use formats::html::{html_to_markdown, html_to_markdown_with_options};
pub use ir::{Block, BlockRecord, Document, Inline, LinkedRef, RichText};
pub use options::CodecOptions;
pub use registry::FormatRegistry;
pub use transforms::{linked_references, normalize, outline, OutlineEntry};

/// Parses markdown into a block document with default options.
///
/// Never fails: text that matches no block rule becomes a paragraph.
pub fn parse(markdown: &str) -> Document {
    parse_with_options(markdown, &CodecOptions::default())
}

pub fn parse_with_options(markdown: &str, options: &CodecOptions) -> Document {
    formats::markdown::parser::parse_markdown(markdown, options)
}

/// Serializes a block document to canonical markdown with default options.
pub fn serialize(doc: &Document) -> String {
    serialize_with_options(doc, &CodecOptions::default())
}

pub fn serialize_with_options(doc: &Document, options: &CodecOptions) -> String {
    formats::markdown::serializer::serialize_markdown(doc, options)
}
