//! Table formats
//!
//! Verse tables and parallel corpora share one interchange shape, [Table]: a header row and
//! rows of text or number cells. Each on-disk format implements [TableFormat] and is looked
//! up in the [FormatRegistry] by name or by file extension:
//! - `xlsx` workbooks (written with rust_xlsxwriter; xlsx, xls and ods read with calamine)
//! - `csv`
//! - `json`, an array of objects keyed by column name
//!
//! The sentence file is plain text and lives in [sentences].

pub mod delimited;
pub mod json;
pub mod registry;
pub mod sentences;
pub mod table;
pub mod workbook;

pub use delimited::CsvFormat;
pub use json::JsonFormat;
pub use registry::{FormatRegistry, TableFormat};
pub use sentences::{read_sentences, write_sentences};
pub use table::{Cell, Table};
pub use workbook::WorkbookFormat;

use std::fs;
use std::path::Path;

use crate::scripture::error::{CorpusError, Result};

/// Create the parent directory of `path` if it does not exist.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| CorpusError::Write {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
