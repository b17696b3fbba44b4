//! Row types written to and read from tables.

use serde::{Deserialize, Serialize};

/// One normalized verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerseRecord {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub text: String,
}

impl VerseRecord {
    pub fn new(
        book: impl Into<String>,
        chapter: impl Into<String>,
        verse: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            book: book.into(),
            chapter: chapter.into(),
            verse: verse.into(),
            text: text.into(),
        }
    }

    /// `chapter:verse`, the key of the combined layout.
    pub fn chapter_verse(&self) -> String {
        format!("{}:{}", self.chapter, self.verse)
    }
}

/// One verse present in both tables of a parallel corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParallelRow {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub left: String,
    pub right: String,
}

/// Column layout of a verse table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    /// `Book, Chapter, Verse, Text`
    #[default]
    Split,
    /// `Book, ChapterVerse, Text`
    Combined,
}

impl TableLayout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "split" => Some(TableLayout::Split),
            "combined" => Some(TableLayout::Combined),
            _ => None,
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        match self {
            TableLayout::Split => &["Book", "Chapter", "Verse", "Text"],
            TableLayout::Combined => &["Book", "ChapterVerse", "Text"],
        }
    }
}
