//! Layered configuration for the notemark tools.
//!
//! The defaults live in `defaults/notemark.default.toml`, compiled into the
//! binary. A [`Loader`] stacks user files and single-key overrides on top,
//! then deserializes and validates the result as a [`NotemarkConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use notemark_babel::CodecOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/notemark.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct NotemarkConfig {
    pub codec: CodecConfig,
    pub convert: ConvertConfig,
}

impl NotemarkConfig {
    pub fn codec_options(&self) -> CodecOptions {
        (&self.codec).into()
    }

    /// Checks the invariants every layer combination must keep. Callers that
    /// edit a built config in place run this again afterwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.codec.list_indent == 0 {
            return Err(ConfigError::Message(
                "codec.list_indent must be at least 1".to_string(),
            ));
        }
        if self.codec.diagram_language.trim().is_empty() {
            return Err(ConfigError::Message(
                "codec.diagram_language must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[codec]`: how markdown is read and written.
#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    /// Fence tag that marks a diagram block.
    pub diagram_language: String,
    /// Spaces per nested list level on output.
    pub list_indent: usize,
}

impl From<&CodecConfig> for CodecOptions {
    fn from(config: &CodecConfig) -> Self {
        CodecOptions::new(config.diagram_language.trim(), config.list_indent)
    }
}

impl From<CodecConfig> for CodecOptions {
    fn from(config: CodecConfig) -> Self {
        (&config).into()
    }
}

/// `[convert]`: output shape of the `convert` command.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub json_pretty: bool,
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the built-in defaults.
    pub fn new() -> Self {
        Self {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        self.builder = self.builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(required),
        );
        self
    }

    /// Stacks a TOML file; `build` fails if it does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Stacks a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    /// Sets one dotted key, e.g. `codec.list_indent`, above every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<NotemarkConfig, ConfigError> {
        let config = self.builder.build()?.try_deserialize::<NotemarkConfig>()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<NotemarkConfig, ConfigError> {
    Loader::new().build()
}
