//! HTML format implementation
//!
//! HTML is an import-only format: it is the clipboard path into the editor.
//! The fragment is converted to markdown text first and then parsed by the
//! markdown scanner, so pasted content and typed content share one grammar.
//!
//! # Library Choice
//!
//! We use `html5ever` with `markup5ever_rcdom` for parsing. Clipboard HTML is
//! rarely well formed; the WHATWG tree builder recovers from unclosed and
//! misnested tags the same way a browser does.
//!
//! # Element Mapping Table
//!
//! | HTML                                   | Markdown                          |
//! |----------------------------------------|-----------------------------------|
//! | `h1`..`h6`                             | `#`..`######` heading             |
//! | `p`, `div`, other containers           | paragraph boundaries              |
//! | `strong`/`b`, `em`/`i`, `s`/`del`      | `**`, `*`, `~~`                   |
//! | `code`, `kbd`, `samp`                  | inline code span                  |
//! | `a href`                               | `[label](href)` if the href passes the sanitizer, else `\[label\]` |
//! | `a data-link-target`                   | `[[target]]` / `[[target\|alias]]` |
//! | `ul`, `ol`, nested lists               | `-` / `1.` lines, indented        |
//! | `li` with a checkbox input             | `- [ ]` / `- [x]`                 |
//! | `blockquote`                           | `>`-prefixed lines                |
//! | `pre`                                  | fenced code (`language-*` class)  |
//! | `table`                                | pipe table with separator row     |
//! | `hr`, `br`                             | `---`, line break                 |
//! | `script`, `style`, `head`, ...         | dropped                           |
//!
//! # Lossy Conversions
//!
//! - Styling attributes and unknown tags are dropped; only their text survives
//! - Images are dropped
//! - Whitespace runs collapse to a single space outside `pre`

pub mod parser;

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::markdown::parser::parse_markdown;
use crate::ir::nodes::Document;
use crate::options::CodecOptions;

pub use parser::{html_to_blocks, html_to_markdown, html_to_markdown_with_options};

/// Format implementation for clipboard HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: CodecOptions,
}

impl HtmlFormat {
    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragments (clipboard import)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let markdown = html_to_markdown_with_options(source, &self.options);
        Ok(parse_markdown(&markdown, &self.options))
    }
}
