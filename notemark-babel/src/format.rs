//! The `Format` trait: one text representation of a block document
//!
//! A format reads its text into a [`Document`], writes a document back out,
//! or both. Directions a format leaves out fall back to
//! [`FormatError::NotSupported`], so clipboard HTML only needs `parse`.

use crate::error::FormatError;
use crate::ir::nodes::Document;

/// Which way a conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Parse,
    Serialize,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Parse => "parsing",
            Direction::Serialize => "serialization",
        }
    }
}

/// A named text representation of the block document.
///
/// ```ignore
/// struct Kinds;
///
/// impl Format for Kinds {
///     fn name(&self) -> &str {
///         "kinds"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
///         Ok(doc.iter_blocks().map(|b| b.kind()).collect::<Vec<_>>().join("\n"))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, e.g. "markdown".
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions without the dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Parse => self.supports_parsing(),
            Direction::Serialize => self.supports_serialization(),
        }
    }

    /// True when `extension` (no dot, any case) belongs to this format.
    fn matches_extension(&self, extension: &str) -> bool {
        self.file_extensions()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }

    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::unsupported(self.name(), Direction::Parse))
    }

    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::unsupported(self.name(), Direction::Serialize))
    }
}
