//! Markdown format implementation
//!
//! This module implements bidirectional conversion between the note dialect of
//! markdown and the block document.
//!
//! # Library Choice
//!
//! The dialect is small and has to round-trip its own output byte for byte,
//! so the scanner and serializer are hand-written rather than built on a
//! CommonMark engine. Regexes (`regex` + `once_cell`) classify block starts;
//! the inline engine is a recursive scanner over byte offsets.
//!
//! # Element Mapping Table
//!
//! | Block          | Markdown                          | Export Notes                          | Import Notes                              |
//! |----------------|-----------------------------------|---------------------------------------|-------------------------------------------|
//! | Heading        | `#`..`######` + space + text      | Empty content still emits `# `        | Up to three leading spaces                |
//! | Paragraph      | Text lines                        | Block-start lookalikes get a `\`      | Ends at a blank line or a block start     |
//! | Quote          | `> ` lines                        | Every line re-prefixed                | One `>` stripped, deeper ones kept        |
//! | Callout        | `> [!TOKEN]` + `> ` lines         | Marker line first                     | Unknown tokens fall back to NOTE          |
//! | List           | `-`, `1.`, `- [ ]` lines          | Indent per level, numbers restart     | Nesting by indentation, any width         |
//! | Table          | Pipe rows + `---` separator       | Padded to the widest row              | Header flag from non-empty header cells   |
//! | Code           | Backtick fence + info string      | Fence grows past inner fences         | No inline parsing                         |
//! | Diagram        | Fence tagged with diagram language| Tag always forced                     | Tag compared case-insensitively           |
//! | ThematicBreak  | `---`                             | Always `---`                          | `---`, `***`, `___` (spaces allowed)      |
//! | Raw            | Lines starting with `<`           | Verbatim                              | Runs to the next blank line               |
//! | Unknown        | ```` ```json ```` dump            | `{"type", "data"}` pretty-printed     | Never produced by the scanner             |
//! | Inline:        |                                   |                                       |                                           |
//! |   Bold         | `**b**` / `__b__`                 | Uses `**`                             | Both                                      |
//! |   Italic       | `*i*` / `_i_`                     | `*`, or `_` next to bold              | Both                                      |
//! |   Strike       | `~~s~~`                           | Direct                                | Direct                                    |
//! |   Code         | `` `c` ``, ``` `` c\ `` ```       | `` \` ``; double form if `\` ends it  | Both; double form verbatim                |
//! |   Link         | `[label](href)`                   | Unbalanced `(`/`)` percent-encoded    | Href must pass the sanitizer              |
//! |   LinkedRef    | `[[target\|alias]]`               | Alias only when it differs            | Target trimmed, empty alias dropped       |
//!
//! # Lossy Conversions
//!
//! - A table whose header cells are all empty comes back as headerless
//! - Nested list items take the style of their top-level list
//! - Line breaks inside headings and list items become spaces
//! - Emphasis and links nested past 32 levels read back as literal text
//! - Hrefs with unbalanced parentheses or whitespace come back percent-encoded
//! - Unknown blocks come back as code blocks

pub mod inline;
pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::Document;
use crate::options::CodecOptions;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: CodecOptions,
}

impl MarkdownFormat {
    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Note markdown dialect"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parser::parse_markdown(source, &self.options))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serializer::serialize_markdown(doc, &self.options))
    }
}
