//! Errors at the fallible edges of the codec
//!
//! The markdown codec itself is total; these only surface around it:
//! looking up a format, decoding block JSON, or asking a format for a
//! direction it does not implement.

use crate::format::Direction;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl FormatError {
    pub(crate) fn unsupported(format: &str, direction: Direction) -> Self {
        FormatError::NotSupported(format!(
            "Format '{format}' does not support {}",
            direction.as_str()
        ))
    }
}
