//! Layered configuration
//!
//! `defaults/verse-corpus.default.toml` is embedded into the binary. [Loader] layers user
//! files and command line overrides on top of it before deserializing into [CorpusConfig].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::scripture::record::TableLayout;

const DEFAULT_TOML: &str = include_str!("../../defaults/verse-corpus.default.toml");

/// Configuration file picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "verse-corpus.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    pub convert: ConvertConfig,
    pub align: AlignConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub format: String,
    pub layout: TableLayout,
    pub sentences: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlignConfig {
    pub format: String,
    pub left_label: String,
    pub right_label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub converted_dir: PathBuf,
    pub corpus_dir: PathBuf,
    pub profiles_dir: PathBuf,
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
    pub fn build(self) -> Result<CorpusConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults, then `verse-corpus.toml` in the working directory, then `explicit` if given.
pub fn loader(explicit: Option<&Path>) -> Loader {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    match explicit {
        Some(path) => loader.with_file(path),
        None => loader,
    }
}

pub fn load(explicit: Option<&Path>) -> Result<CorpusConfig, ConfigError> {
    loader(explicit).build()
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CorpusConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.format, "xlsx");
        assert_eq!(config.convert.layout, TableLayout::Split);
        assert!(config.convert.sentences);
        assert_eq!(config.paths.converted_dir, PathBuf::from("CONVERTED_FILES"));
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.layout", "combined")
            .unwrap()
            .set_override("align.left_label", "English")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.convert.layout, TableLayout::Combined);
        assert_eq!(config.align.left_label, "English");
    }

    #[test]
    fn layers_explicit_files() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[convert]\nsentences = false\n[align]\nright_label = \"Spanish\"").unwrap();
        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert!(!config.convert.sentences);
        assert_eq!(config.convert.format, "xlsx");
        assert_eq!(config.align.right_label, "Spanish");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Loader::new().with_file("/nonexistent/verse-corpus.toml").build().is_err());
        assert!(load(Some(Path::new("/nonexistent/verse-corpus.toml"))).is_err());
    }
}
