//! Line classification results.

use serde::Serialize;
use std::fmt;

/// Identifier of one verse as it appears in the Verse column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum VerseId {
    Number(u32),
    /// Sub-verse such as `6a`.
    Lettered(u32, char),
    /// Opaque id copied from an already delimited source.
    Label(String),
}

impl VerseId {
    /// Parse a verse label read from a delimited source.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if let Ok(n) = label.parse::<u32>() {
            return VerseId::Number(n);
        }
        let mut chars = label.chars();
        if let Some(letter) = chars.next_back() {
            if letter.is_ascii_lowercase() {
                if let Ok(n) = chars.as_str().parse::<u32>() {
                    return VerseId::Lettered(n, letter);
                }
            }
        }
        VerseId::Label(label.to_string())
    }

    /// Numeric part of the id, if it has one.
    pub fn number(&self) -> Option<u32> {
        match self {
            VerseId::Number(n) | VerseId::Lettered(n, _) => Some(*n),
            VerseId::Label(_) => None,
        }
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseId::Number(n) => write!(f, "{}", n),
            VerseId::Lettered(n, letter) => write!(f, "{}{}", n, letter),
            VerseId::Label(label) => f.write_str(label),
        }
    }
}

/// Why a line carries no verse content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoiseKind {
    Blank,
    /// Copyright notices, publisher footers and other profile noise markers.
    Footer,
    /// Section heading carrying a cross reference such as `(Mt. 27:1-2)`.
    CrossReference,
    /// Parenthetical-only line or a stray single letter.
    Fragment,
    PageNumber,
    /// Repeated book/chapter header at the top of a page.
    RunningHeader,
}

/// Classification of one prepared line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LineClass {
    BookChapterHeader { book: String, chapter: Option<u32> },
    ChapterHeader(u32),
    /// Bare number whose role depends on context; see
    /// [resolve_bare_number](crate::scripture::lexing::line_classification::resolve_bare_number).
    NumericAmbiguous(u32),
    VerseStart { verse: VerseId, text: String },
    VerseRange { start: u32, end: u32, text: String },
    Continuation(String),
    Noise(NoiseKind),
}

impl fmt::Display for LineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineClass::BookChapterHeader {
                book,
                chapter: Some(chapter),
            } => write!(f, "book-header {} {}", book, chapter),
            LineClass::BookChapterHeader {
                book,
                chapter: None,
            } => write!(f, "book-header {}", book),
            LineClass::ChapterHeader(chapter) => write!(f, "chapter-header {}", chapter),
            LineClass::NumericAmbiguous(n) => write!(f, "ambiguous-number {}", n),
            LineClass::VerseStart { verse, text } => write!(f, "verse {} | {}", verse, text),
            LineClass::VerseRange { start, end, text } => {
                write!(f, "verse-range {}-{} | {}", start, end, text)
            }
            LineClass::Continuation(text) => write!(f, "continuation | {}", text),
            LineClass::Noise(kind) => write!(f, "noise {:?}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verse_labels() {
        assert_eq!(VerseId::parse("12"), VerseId::Number(12));
        assert_eq!(VerseId::parse(" 6a "), VerseId::Lettered(6, 'a'));
        assert_eq!(VerseId::parse("x"), VerseId::Label("x".to_string()));
        assert_eq!(VerseId::Lettered(6, 'b').to_string(), "6b");
    }
}
