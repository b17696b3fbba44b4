//! File processing API
//!
//! The two operations the binary exposes, working on paths: converting a raw dump into a
//! verse table plus sentence file, and aligning two verse tables into a parallel corpus.
//!
//! ```rust,ignore
//! use verse_corpus::scripture::processor::{convert_file, ConvertOptions};
//!
//! let registry = ProfileRegistry::with_defaults()?;
//! let profile = registry.resolve("bikolano")?;
//! let options = ConvertOptions::new("out/bikolano.xlsx").with_sentences("out/bikolano.txt");
//! let summary = convert_file(Path::new("RAW_FILES/bikolano.txt"), &profile, &options, &FormatRegistry::default())?;
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::scripture::alignment::{align, records_from_table, BookSynonyms};
use crate::scripture::config::CorpusConfig;
use crate::scripture::error::{CorpusError, Result};
use crate::scripture::formats::{write_sentences, FormatRegistry, Table};
use crate::scripture::pipeline::{ClassifiedLine, Converter};
use crate::scripture::profile::LanguageProfile;
use crate::scripture::record::{TableLayout, VerseRecord};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output: PathBuf,
    /// Sentence file; `None` skips it.
    pub sentences: Option<PathBuf>,
    /// Table format name; `None` picks it from the output extension.
    pub format: Option<String>,
    pub layout: TableLayout,
}

impl ConvertOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            sentences: None,
            format: None,
            layout: TableLayout::default(),
        }
    }

    pub fn with_sentences(mut self, path: impl Into<PathBuf>) -> Self {
        self.sentences = Some(path.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub records: usize,
    pub sentences: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct AlignOptions {
    pub output: PathBuf,
    pub format: Option<String>,
    pub left_label: String,
    pub right_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignSummary {
    pub left: usize,
    pub right: usize,
    pub aligned: usize,
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a raw dump into a verse table and, optionally, a sentence file.
pub fn convert_file(
    input: &Path,
    profile: &LanguageProfile,
    options: &ConvertOptions,
    formats: &FormatRegistry,
) -> Result<ConvertSummary> {
    let bytes = read_input(input)?;
    let converter = Converter::new(profile)?;
    let conversion = converter.convert_bytes(&bytes);

    let format = formats.resolve(options.format.as_deref(), &options.output)?;
    let table = Table::from_records(&conversion.records, options.layout);
    format.write(&table, &options.output)?;
    info!(
        path = %options.output.display(),
        records = conversion.records.len(),
        "wrote verse table"
    );

    if let Some(path) = &options.sentences {
        write_sentences(path, &conversion.sentences)?;
        info!(path = %path.display(), sentences = conversion.sentences.len(), "wrote sentences");
    }

    Ok(ConvertSummary {
        records: conversion.records.len(),
        sentences: conversion.sentences.len(),
        skipped: conversion.skipped,
    })
}

/// Classify every prepared line of a raw dump.
pub fn classify_file(input: &Path, profile: &LanguageProfile) -> Result<Vec<ClassifiedLine>> {
    let bytes = read_input(input)?;
    let converter = Converter::new(profile)?;
    Ok(converter.classify_str(&crate::scripture::lexing::decode(&bytes)))
}

/// Read verse records from any supported table file.
pub fn read_records(path: &Path, formats: &FormatRegistry) -> Result<Vec<VerseRecord>> {
    if !path.is_file() {
        return Err(CorpusError::Read {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
    }
    let table = formats.for_path(path)?.read(path)?;
    records_from_table(&table, path)
}

/// Join two verse tables into a parallel corpus.
pub fn align_files(
    left: &Path,
    right: &Path,
    synonyms: &BookSynonyms,
    options: &AlignOptions,
    formats: &FormatRegistry,
) -> Result<AlignSummary> {
    let left_records = read_records(left, formats)?;
    let right_records = read_records(right, formats)?;
    let rows = align(&left_records, &right_records, synonyms);

    let format = formats.resolve(options.format.as_deref(), &options.output)?;
    let table = Table::from_parallel(&rows, &options.left_label, &options.right_label);
    format.write(&table, &options.output)?;
    info!(
        path = %options.output.display(),
        left = left_records.len(),
        right = right_records.len(),
        aligned = rows.len(),
        "wrote parallel corpus"
    );

    Ok(AlignSummary {
        left: left_records.len(),
        right: right_records.len(),
        aligned: rows.len(),
    })
}

/// `<converted_dir>/<stem>_cleaned.<format>` and `<converted_dir>/<stem>_sentences.txt`.
pub fn default_convert_paths(input: &Path, format: &str, config: &CorpusConfig) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("converted");
    let dir = &config.paths.converted_dir;
    (
        dir.join(format!("{}_cleaned.{}", stem, format)),
        dir.join(format!("{}_sentences.txt", stem)),
    )
}

/// `<corpus_dir>/<left>-<right>-corpus.<format>`
pub fn default_corpus_path(left_label: &str, right_label: &str, format: &str, config: &CorpusConfig) -> PathBuf {
    config
        .paths
        .corpus_dir
        .join(format!("{}-{}-corpus.{}", left_label, right_label, format))
}
