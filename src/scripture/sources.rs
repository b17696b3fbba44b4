//! Line-per-verse source layouts
//!
//! Some dumps already carry one verse per line: either delimited fields
//! (`40N<TAB>1<TAB>1<TAB>text`, `Matthew|1|1|text`) or a `chapter:verse text` prefix with the
//! book implied by the order of the file. Lines that do not fit the layout are skipped and
//! counted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

use crate::scripture::assembling::{VerseAssembler, VerseBlock};
use crate::scripture::profile::LanguageProfile;
use crate::scripture::token::{LineClass, VerseId};

static CHAPTER_VERSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d+)([a-z])?\s+(.*)$").unwrap());

/// Blocks read from a line-per-verse source.
#[derive(Debug, Default)]
pub struct SourceScan {
    pub blocks: Vec<VerseBlock>,
    /// Lines that did not fit the layout.
    pub skipped: usize,
}

/// Read `book<d>chapter<d>verse<d>text` lines. Book ids found in `book_ids` are replaced by
/// their names; other ids are kept as they are.
pub fn read_delimited(
    lines: &[String],
    delimiter: char,
    book_ids: &BTreeMap<String, String>,
) -> SourceScan {
    let mut scan = SourceScan::default();
    for line in lines {
        let fields: Vec<&str> = line.splitn(4, delimiter).map(str::trim).collect();
        let [book, chapter, verse, text] = fields[..] else {
            scan.skipped += 1;
            continue;
        };
        if chapter.is_empty() || !chapter.chars().all(|c| c.is_ascii_digit()) {
            scan.skipped += 1;
            continue;
        }
        let book = book_ids.get(book).map(String::as_str).unwrap_or(book);
        scan.blocks
            .push(VerseBlock::new(book, chapter, VerseId::parse(verse), text));
    }
    debug!(
        blocks = scan.blocks.len(),
        skipped = scan.skipped,
        "read delimited source"
    );
    scan
}

/// Read `chapter:verse text` lines, taking books from the profile's book sequence.
pub fn read_chapter_verse(lines: &[String], profile: &LanguageProfile) -> SourceScan {
    let mut scan = SourceScan::default();
    let mut assembler = VerseAssembler::new(profile);

    for line in lines {
        let Some(captures) = CHAPTER_VERSE.captures(line) else {
            scan.skipped += 1;
            continue;
        };
        let (Ok(chapter), Ok(verse)) = (captures[1].parse::<u32>(), captures[2].parse::<u32>())
        else {
            scan.skipped += 1;
            continue;
        };
        let starts_book = profile.verses.verse_one_rollover
            && chapter == 1
            && verse == 1
            && assembler.cursor().book.is_some();
        if starts_book {
            scan.blocks.extend(assembler.next_book());
        }
        if assembler.cursor().chapter != Some(chapter) || assembler.cursor().book.is_none() {
            scan.blocks
                .extend(assembler.process(LineClass::ChapterHeader(chapter)));
        }
        let verse = match captures.get(3).and_then(|m| m.as_str().chars().next()) {
            Some(letter) => VerseId::Lettered(verse, letter),
            None => VerseId::Number(verse),
        };
        scan.blocks.extend(assembler.process(LineClass::VerseStart {
            verse,
            text: captures[4].to_string(),
        }));
    }
    scan.blocks.extend(assembler.finish());

    debug!(
        blocks = scan.blocks.len(),
        skipped = scan.skipped,
        "read chapter:verse source"
    );
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripture::profile::ProfileRegistry;

    fn lines(source: &str) -> Vec<String> {
        source.lines().map(str::to_string).collect()
    }

    #[test]
    fn delimited_maps_book_ids_and_skips_short_lines() {
        let ids = BTreeMap::from([("40N".to_string(), "Matthew".to_string())]);
        let scan = read_delimited(
            &lines("40N\t1\t1\tAng basahon\n41N\t2\t3\tSi Juan\n40N\t1\n"),
            '\t',
            &ids,
        );
        assert_eq!(scan.skipped, 1);
        assert_eq!(scan.blocks[0].book, "Matthew");
        assert_eq!(scan.blocks[1].book, "41N");
        assert_eq!(scan.blocks[1].verses, vec![VerseId::Number(3)]);
    }

    #[test]
    fn delimited_skips_header_rows_and_keeps_pipes_in_text() {
        let scan = read_delimited(
            &lines("Book|Chapter|Verse|Text\nMatthew|1|1|In the beginning | was\n"),
            '|',
            &BTreeMap::new(),
        );
        assert_eq!(scan.skipped, 1);
        assert_eq!(scan.blocks.len(), 1);
        assert_eq!(scan.blocks[0].text, "In the beginning | was");
    }

    #[test]
    fn chapter_verse_advances_books_when_chapter_one_returns() {
        let registry = ProfileRegistry::with_defaults().unwrap();
        let spanish = registry.get("spanish").unwrap();
        let scan = read_chapter_verse(
            &lines("1:1 Libro\n1:2 de la\n2:1 Y\nnot a verse\n1:1 Principio\n"),
            spanish,
        );
        assert_eq!(scan.skipped, 1);
        let keys: Vec<(&str, &str)> = scan
            .blocks
            .iter()
            .map(|block| (block.book.as_str(), block.chapter.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Matthew", "1"),
                ("Matthew", "1"),
                ("Matthew", "2"),
                ("Mark", "1")
            ]
        );
    }

    #[test]
    fn verse_one_rollover_covers_single_chapter_books() {
        let registry = ProfileRegistry::with_defaults().unwrap();
        let spanish = registry.get("spanish").unwrap();
        let scan = read_chapter_verse(
            &lines("1:1 Libro\n1:2 de la\n1:1 Principio\n2:1 Y\n1:1 Por cuanto\n"),
            spanish,
        );
        let books: Vec<&str> = scan.blocks.iter().map(|block| block.book.as_str()).collect();
        assert_eq!(books, vec!["Matthew", "Matthew", "Mark", "Mark", "Luke"]);
    }

    #[test]
    fn chapter_rollover_alone_keeps_single_chapter_books_together() {
        let registry = ProfileRegistry::with_defaults().unwrap();
        let tagalog = registry.get("tagalog").unwrap();
        let scan = read_chapter_verse(&lines("1:1 Ang\n1:2 Si\n1:1 Ang\n"), tagalog);
        assert!(scan.blocks.iter().all(|block| block.book == "Matthew"));
    }
}
