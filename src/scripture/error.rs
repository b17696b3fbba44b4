//! Error type shared by the library and the binary.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorpusError>;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid profile {origin}: {source}")]
    Profile {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unknown profile `{0}`")]
    UnknownProfile(String),
    #[error("profile `{profile}` has an invalid pattern: {source}")]
    Pattern {
        profile: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Workbook(#[from] calamine::Error),
    #[error("workbook {path} does not contain any worksheets")]
    EmptyWorkbook { path: PathBuf },
    #[error("table {path} is missing columns: {missing}")]
    MissingColumns { path: PathBuf, missing: String },
    #[error("unsupported table format `{0}` (expected xlsx, xls, ods, csv or json)")]
    UnsupportedFormat(String),
}
