//! Knobs shared by the parser and the serializer.

/// Fence language that marks a diagram block unless configured otherwise.
pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

/// Spaces per nesting level emitted for nested list items.
pub const DEFAULT_LIST_INDENT: usize = 2;

/// Options accepted by the markdown codec.
///
/// The library never reads configuration on its own; callers (the CLI, the
/// editor session) build this from `notemark-config` or use [`Default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Fence language token (compared case-insensitively) for diagram blocks.
    pub diagram_language: String,
    /// Indentation width the serializer uses per list nesting level.
    pub list_indent: usize,
}

impl CodecOptions {
    pub fn new(diagram_language: impl Into<String>, list_indent: usize) -> Self {
        Self {
            diagram_language: diagram_language.into(),
            list_indent: list_indent.max(1),
        }
    }

    pub(crate) fn is_diagram_language(&self, language: &str) -> bool {
        !language.is_empty() && language.eq_ignore_ascii_case(&self.diagram_language)
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGRAM_LANGUAGE, DEFAULT_LIST_INDENT)
    }
}
