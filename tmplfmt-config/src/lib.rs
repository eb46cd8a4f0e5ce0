//! Shared configuration loader for the tmplfmt toolchain.
//!
//! `defaults/tmplfmt.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TmplfmtConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use tmplfmt_core::Options;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/tmplfmt.default.toml");

/// Name of the per-project configuration file looked up by the CLI.
pub const PROJECT_FILE: &str = "tmplfmt.toml";

/// Top-level configuration consumed by tmplfmt applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TmplfmtConfig {
    pub format: FormatConfig,
    pub files: FilesConfig,
}

/// Mirrors the knobs exposed by the formatter.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    pub line_length: usize,
    pub indent: usize,
    /// `None` keeps the source's own final newline.
    #[serde(default)]
    pub trailing_newline: Option<bool>,
}

/// File discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub extensions: Vec<String>,
}

impl FormatConfig {
    /// Formatter options for a source that did (or did not) end with a newline.
    pub fn options(&self, source_has_trailing_newline: bool) -> Options {
        Options::new()
            .with_line_length(self.line_length)
            .with_indent(self.indent)
            .with_trailing_newline(
                self.trailing_newline
                    .unwrap_or(source_has_trailing_newline),
            )
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TmplfmtConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TmplfmtConfig, ConfigError> {
    Loader::new().build()
}
