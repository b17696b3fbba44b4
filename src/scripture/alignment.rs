//! Corpus alignment
//!
//! Two verse tables become a parallel corpus by joining them on (Book, Chapter, Verse).
//! Book names are first mapped to a canonical spelling through [BookSynonyms]; names the map
//! does not know are compared as they are. The join is one-to-one: when a key occurs more
//! than once, occurrences pair up in table order and the surplus is dropped, so the corpus
//! never has more rows than the smaller table.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use crate::scripture::error::{CorpusError, Result};
use crate::scripture::formats::Table;
use crate::scripture::profile::LanguageProfile;
use crate::scripture::record::{ParallelRow, VerseRecord};

const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("Mat", "Matthew"),
    ("Matt", "Matthew"),
    ("Mathew", "Matthew"),
    ("Matthew", "Matthew"),
    ("Mar", "Mark"),
    ("Mk", "Mark"),
    ("Mark", "Mark"),
    ("Luk", "Luke"),
    ("Lk", "Luke"),
    ("Luke", "Luke"),
    ("Mateo", "Matthew"),
    ("Marcos", "Mark"),
    ("Lucas", "Luke"),
];

/// Book name -> canonical book name.
#[derive(Debug, Clone, Default)]
pub struct BookSynonyms {
    names: HashMap<String, String>,
}

impl BookSynonyms {
    pub fn new() -> Self {
        Self::default()
    }

    /// English and Spanish gospel names and abbreviations.
    pub fn with_defaults() -> Self {
        let mut synonyms = Self::new();
        for (name, canonical) in DEFAULT_SYNONYMS {
            synonyms.insert(*name, *canonical);
        }
        synonyms
    }

    pub fn insert(&mut self, name: impl Into<String>, canonical: impl Into<String>) {
        self.names.insert(name.into(), canonical.into());
    }

    /// Add the synonyms a profile declares for its own book names.
    pub fn extend_from_profile(&mut self, profile: &LanguageProfile) {
        for (name, canonical) in &profile.synonyms {
            self.insert(name.clone(), canonical.clone());
        }
    }

    pub fn canonical<'a>(&'a self, book: &'a str) -> &'a str {
        let book = book.trim();
        self.names.get(book).map(String::as_str).unwrap_or(book)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read verse records out of a table with `Book, Chapter, Verse, Text` or
/// `Book, ChapterVerse, Text` columns. `Sentence` is accepted in place of `Text`.
pub fn records_from_table(table: &Table, path: &Path) -> Result<Vec<VerseRecord>> {
    let book = table.column("Book");
    let text = table.column("Text").or_else(|| table.column("Sentence"));
    let split = table.column("Chapter").zip(table.column("Verse"));
    let combined = table.column("ChapterVerse");

    let mut missing = Vec::new();
    if book.is_none() {
        missing.push("Book");
    }
    if split.is_none() && combined.is_none() {
        missing.push("Chapter, Verse");
    }
    if text.is_none() {
        missing.push("Text");
    }
    let (Some(book), Some(text)) = (book, text) else {
        return Err(missing_columns(path, &missing));
    };

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let (chapter, verse) = match (split, combined) {
            (Some((chapter, verse)), _) => (table.value(row, chapter), table.value(row, verse)),
            (None, Some(combined)) => split_chapter_verse(&table.value(row, combined)),
            (None, None) => return Err(missing_columns(path, &missing)),
        };
        records.push(VerseRecord::new(
            table.value(row, book).trim(),
            chapter.trim(),
            verse.trim(),
            table.value(row, text),
        ));
    }
    Ok(records)
}

fn missing_columns(path: &Path, missing: &[&str]) -> CorpusError {
    CorpusError::MissingColumns {
        path: path.to_path_buf(),
        missing: missing.join(", "),
    }
}

/// `3:16` -> (`3`, `16`), split at the first colon.
fn split_chapter_verse(key: &str) -> (String, String) {
    match key.split_once(':') {
        Some((chapter, verse)) => (chapter.to_string(), verse.to_string()),
        None => (key.to_string(), String::new()),
    }
}

/// Inner join of two verse tables on canonical (Book, Chapter, Verse), in left-table order.
pub fn align(
    left: &[VerseRecord],
    right: &[VerseRecord],
    synonyms: &BookSynonyms,
) -> Vec<ParallelRow> {
    let key = |record: &VerseRecord| {
        (
            synonyms.canonical(&record.book).to_string(),
            record.chapter.clone(),
            record.verse.clone(),
        )
    };

    let mut pending: HashMap<(String, String, String), VecDeque<usize>> = HashMap::new();
    for (i, record) in right.iter().enumerate() {
        pending.entry(key(record)).or_default().push_back(i);
    }

    let mut rows = Vec::new();
    for record in left {
        let (book, chapter, verse) = key(record);
        let matched = pending
            .get_mut(&(book.clone(), chapter.clone(), verse.clone()))
            .and_then(VecDeque::pop_front);
        if let Some(j) = matched {
            rows.push(ParallelRow {
                book,
                chapter,
                verse,
                left: record.text.clone(),
                right: right[j].text.clone(),
            });
        }
    }
    rows
}
