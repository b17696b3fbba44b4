//! Format registry for verse tables
//!
//! Each format implements the `TableFormat` trait and can be registered with `FormatRegistry`.

use std::collections::HashMap;
use std::path::Path;

use super::table::Table;
use crate::scripture::error::{CorpusError, Result};

/// A file format a [Table] can be written to and read from.
pub trait TableFormat: Send + Sync {
    /// The name of this format (e.g., "xlsx", "csv")
    fn name(&self) -> &str;

    /// File extensions this format reads.
    fn extensions(&self) -> &[&str];

    fn write(&self, table: &Table, path: &Path) -> Result<()>;

    fn read(&self, path: &Path) -> Result<Table>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of table formats
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn TableFormat>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format of the same name
    pub fn register<F: TableFormat + 'static>(&mut self, format: F) {
        self.formats.insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Option<&dyn TableFormat> {
        self.formats
            .get(&name.to_ascii_lowercase())
            .map(|format| format.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Format reading files with the extension of `path`.
    pub fn for_path(&self, path: &Path) -> Result<&dyn TableFormat> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        self.formats
            .values()
            .find(|format| format.extensions().contains(&extension.as_str()))
            .map(|format| format.as_ref())
            .ok_or(CorpusError::UnsupportedFormat(extension))
    }

    /// The named format, or the one matching the extension of `path`.
    pub fn resolve(&self, name: Option<&str>, path: &Path) -> Result<&dyn TableFormat> {
        match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| CorpusError::UnsupportedFormat(name.to_string())),
            None => self.for_path(path),
        }
    }

    /// Create registry with the workbook, csv and json formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::WorkbookFormat);
        registry.register(super::CsvFormat);
        registry.register(super::JsonFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
