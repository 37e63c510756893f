//! Block JSON format
//!
//! The JSON form of a [`Document`] is the editor's structured boundary:
//! `{"blocks": [{"id"?, "type", "data"}, ...]}`. Records with an unrecognized
//! `type`, or a `data` payload that does not fit the known shape, decode into
//! [`Block::Unknown`](crate::ir::nodes::Block::Unknown) and encode back
//! unchanged.

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::Document;

/// Format implementation for block JSON
#[derive(Debug, Clone)]
pub struct JsonFormat {
    pretty: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormat {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn compact() -> Self {
        Self::new(false)
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Block records as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        };
        json.map(|mut text| {
            text.push('\n');
            text
        })
        .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
