//! Name-keyed set of formats
//!
//! The built-in set shares one [`CodecOptions`] so that markdown typed,
//! pasted or loaded from JSON is parsed and rendered the same way.
//!
//! ```ignore
//! let registry = FormatRegistry::default();
//! let doc = registry.parse("# Title", "markdown")?;
//! let json = registry.serialize(&doc, "json")?;
//! ```

use crate::error::FormatError;
use crate::format::{Direction, Format};
use crate::formats::{HtmlFormat, JsonFormat, MarkdownFormat};
use crate::ir::nodes::Document;
use crate::options::CodecOptions;
use std::collections::BTreeMap;
use std::path::Path;

pub struct FormatRegistry {
    options: CodecOptions,
    formats: BTreeMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// An empty registry. Formats added later pick their own options.
    pub fn new() -> Self {
        FormatRegistry {
            options: CodecOptions::default(),
            formats: BTreeMap::new(),
        }
    }

    /// Markdown, HTML and JSON, all reading `options`.
    pub fn with_options(options: CodecOptions) -> Self {
        let mut registry = FormatRegistry {
            options,
            formats: BTreeMap::new(),
        };
        registry.register(MarkdownFormat::with_options(registry.options.clone()));
        registry.register(HtmlFormat::with_options(registry.options.clone()));
        registry.register(JsonFormat::default());
        registry
    }

    pub fn with_defaults() -> Self {
        Self::with_options(CodecOptions::default())
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Adds `format`, replacing any format of the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    /// Format name for a path, by extension (case-insensitive).
    ///
    /// When two formats claim an extension the alphabetically first wins.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        self.formats
            .values()
            .find(|format| format.matches_extension(extension))
            .map(|format| format.name().to_string())
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        self.supporting(format, Direction::Parse)?.parse(source)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.supporting(format, Direction::Serialize)?
            .serialize(doc)
    }

    /// Parse with `from`, serialize with `to`.
    ///
    /// Both directions are checked before any work is done.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, FormatError> {
        let reader = self.supporting(from, Direction::Parse)?;
        let writer = self.supporting(to, Direction::Serialize)?;
        writer.serialize(&reader.parse(source)?)
    }

    fn supporting(&self, name: &str, direction: Direction) -> Result<&dyn Format, FormatError> {
        let format = self.get(name)?;
        if format.supports(direction) {
            Ok(format)
        } else {
            Err(FormatError::unsupported(name, direction))
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
