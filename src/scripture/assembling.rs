//! Verse assembly
//!
//! [VerseAssembler] is the state machine that turns classified lines into verse blocks. It
//! owns the [ScanCursor] (current book, chapter and last verse number) and lends it to the
//! classifier so bare numbers can be resolved against it.
//!
//! The assembler is either idle or has one verse open. A verse start closes the open verse
//! and opens the next one; continuation text extends the open verse; headers close it and
//! move the cursor. Ranges (`2-3`) are materialised at once as a single block covering every
//! verse of the range, and the assembler stays idle afterwards.
//!
//! Profiles with `drop_reference_headings` hold back the latest continuation line until the
//! next non-noise line: a cross reference arriving first marks it as a section heading and it
//! is discarded.

use serde::Serialize;
use tracing::{debug, trace};

use crate::scripture::profile::{LanguageProfile, VerseRules};
use crate::scripture::token::{LineClass, NoiseKind, VerseId};

/// Book written for verses seen before any book is known.
pub const UNKNOWN_BOOK: &str = "Unknown";

/// Where the scan currently is in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCursor {
    pub book: Option<String>,
    pub chapter: Option<u32>,
    /// Highest verse number seen in the current chapter, 0 when none.
    pub last_verse: u32,
    /// Position in the profile's book sequence of the next book to take.
    pub sequence_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssemblerState {
    #[default]
    Idle,
    Open { verse: VerseId, text: String },
}

/// Text of one verse (or one verse range) with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseBlock {
    pub book: String,
    pub chapter: String,
    pub verses: Vec<VerseId>,
    pub text: String,
}

impl VerseBlock {
    pub fn new(book: impl Into<String>, chapter: impl Into<String>, verse: VerseId, text: &str) -> Self {
        Self {
            book: book.into(),
            chapter: chapter.into(),
            verses: vec![verse],
            text: collapse_whitespace(text),
        }
    }
}

pub struct VerseAssembler {
    rules: VerseRules,
    book_sequence: Vec<String>,
    cursor: ScanCursor,
    state: AssemblerState,
    held_line: Option<String>,
}

impl VerseAssembler {
    pub fn new(profile: &LanguageProfile) -> Self {
        Self {
            rules: profile.verses.clone(),
            book_sequence: profile.book_sequence.clone(),
            cursor: ScanCursor::default(),
            state: AssemblerState::Idle,
            held_line: None,
        }
    }

    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    pub fn state(&self) -> &AssemblerState {
        &self.state
    }

    /// A header repeating the current book (and chapter, if it names one).
    pub fn is_running_header(&self, book: &str, chapter: Option<u32>) -> bool {
        self.cursor.book.as_deref() == Some(book)
            && (chapter.is_none() || chapter == self.cursor.chapter)
    }

    /// Feed one classified line. Returns the blocks completed by it.
    pub fn process(&mut self, class: LineClass) -> Vec<VerseBlock> {
        let mut blocks = Vec::new();
        if self.rules.drop_reference_headings {
            match &class {
                LineClass::Noise(NoiseKind::CrossReference) => {
                    if let Some(heading) = self.held_line.take() {
                        debug!(%heading, "dropped heading before a cross reference");
                    }
                    return blocks;
                }
                LineClass::Noise(_) => return blocks,
                LineClass::Continuation(text) => {
                    if let Some(line) = self.held_line.replace(text.clone()) {
                        self.continue_verse(line);
                    }
                    return blocks;
                }
                _ => self.release_held_line(),
            }
        }
        match class {
            LineClass::BookChapterHeader { book, chapter } => {
                if self.is_running_header(&book, chapter) {
                    trace!(%book, "running header");
                    return blocks;
                }
                blocks.extend(self.flush());
                self.sync_sequence(&book);
                self.cursor.book = Some(book);
                self.cursor.chapter = chapter;
                self.cursor.last_verse = 0;
            }
            LineClass::ChapterHeader(chapter) => {
                blocks.extend(self.flush());
                if self.cursor.book.is_none() {
                    if self.cursor.sequence_index < self.book_sequence.len() {
                        self.advance_book();
                    }
                } else if self.rules.book_rollover
                    && chapter == 1
                    && self.cursor.chapter.is_some_and(|current| current > 1)
                {
                    self.advance_book();
                }
                self.cursor.chapter = Some(chapter);
                self.cursor.last_verse = 0;
            }
            LineClass::VerseStart { verse, text } => {
                blocks.extend(self.flush());
                if let Some(n) = verse.number() {
                    self.roll_chapter_over(n);
                    self.cursor.last_verse = n;
                }
                self.state = AssemblerState::Open { verse, text };
            }
            LineClass::VerseRange { start, end, text } => {
                blocks.extend(self.flush());
                self.roll_chapter_over(start);
                let mut block = self.block(VerseId::Number(start), &text);
                block.verses = (start..=end).map(VerseId::Number).collect();
                self.cursor.last_verse = end;
                blocks.push(block);
            }
            LineClass::Continuation(text) => self.continue_verse(text),
            LineClass::NumericAmbiguous(n) => {
                debug!(n, "unresolved bare number ignored");
            }
            LineClass::Noise(_) => {}
        }
        blocks
    }

    /// Close the open verse and move to the next book of the sequence with no chapter yet.
    pub fn next_book(&mut self) -> Vec<VerseBlock> {
        self.release_held_line();
        let blocks = self.flush().into_iter().collect();
        self.advance_book();
        self.cursor.chapter = None;
        self.cursor.last_verse = 0;
        blocks
    }

    /// Close the open verse at end of input.
    pub fn finish(&mut self) -> Vec<VerseBlock> {
        self.release_held_line();
        self.flush().into_iter().collect()
    }

    fn continue_verse(&mut self, text: String) {
        match &mut self.state {
            AssemblerState::Open { text: open, .. } => {
                if !open.is_empty() {
                    open.push(' ');
                }
                open.push_str(&text);
            }
            AssemblerState::Idle => {
                if self.rules.implicit_first_verse && self.cursor.last_verse == 0 {
                    self.cursor.last_verse = 1;
                    self.state = AssemblerState::Open {
                        verse: VerseId::Number(1),
                        text,
                    };
                } else {
                    debug!(%text, "dropped text outside a verse");
                }
            }
        }
    }

    fn release_held_line(&mut self) {
        if let Some(line) = self.held_line.take() {
            self.continue_verse(line);
        }
    }

    fn flush(&mut self) -> Option<VerseBlock> {
        match std::mem::take(&mut self.state) {
            AssemblerState::Open { verse, text } => Some(self.block(verse, &text)),
            AssemblerState::Idle => None,
        }
    }

    fn block(&self, verse: VerseId, text: &str) -> VerseBlock {
        let book = self.cursor.book.as_deref().unwrap_or(UNKNOWN_BOOK);
        let chapter = self.cursor.chapter.unwrap_or(1).to_string();
        VerseBlock::new(book, chapter, verse, text)
    }

    fn roll_chapter_over(&mut self, verse: u32) {
        if self.rules.chapter_rollover && verse == 1 && self.cursor.last_verse > 1 {
            let next = self.cursor.chapter.unwrap_or(1).saturating_add(1);
            trace!(chapter = next, "chapter rollover");
            self.cursor.chapter = Some(next);
        }
    }

    fn advance_book(&mut self) {
        let index = self.cursor.sequence_index;
        let book = self
            .book_sequence
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("UnknownBook{}", index + 1));
        debug!(%book, "next book in sequence");
        self.cursor.book = Some(book);
        self.cursor.sequence_index = index + 1;
    }

    fn sync_sequence(&mut self, book: &str) {
        if let Some(position) = self
            .book_sequence
            .iter()
            .position(|name| name.eq_ignore_ascii_case(book))
        {
            self.cursor.sequence_index = position + 1;
        }
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
