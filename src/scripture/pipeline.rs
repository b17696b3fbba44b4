//! Conversion pipeline
//!
//! Raw dump -> prepared lines -> verse blocks -> normalized records and sentences. The
//! profile's layout decides how lines become blocks: free-form verse text goes through the
//! classifier and the assembler, line-per-verse layouts through [sources](crate::scripture::sources).

use serde::Serialize;
use tracing::{debug, trace};

use crate::scripture::assembling::{VerseAssembler, VerseBlock};
use crate::scripture::error::Result;
use crate::scripture::lexing::{decode, prepare_lines, ClassifyContext, LineClassifier};
use crate::scripture::normalization::TextNormalizer;
use crate::scripture::profile::{LanguageProfile, SourceLayout};
use crate::scripture::record::VerseRecord;
use crate::scripture::sources::{read_chapter_verse, read_delimited, SourceScan};
use crate::scripture::token::{LineClass, NoiseKind};

/// Result of converting one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub records: Vec<VerseRecord>,
    pub sentences: Vec<String>,
    /// Lines a line-per-verse layout could not read.
    pub skipped: usize,
}

/// A prepared line with the class the pipeline gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine {
    pub number: usize,
    pub line: String,
    pub rule: &'static str,
    pub class: LineClass,
}

pub struct Converter {
    profile: LanguageProfile,
    classifier: LineClassifier,
    normalizer: TextNormalizer,
}

impl Converter {
    pub fn new(profile: &LanguageProfile) -> Result<Self> {
        Ok(Self {
            profile: profile.clone(),
            classifier: LineClassifier::new(profile)?,
            normalizer: TextNormalizer::new(&profile.normalize),
        })
    }

    pub fn convert_bytes(&self, bytes: &[u8]) -> Conversion {
        self.convert_str(&decode(bytes))
    }

    pub fn convert_str(&self, source: &str) -> Conversion {
        let lines = self.prepare(source);
        let scan = match &self.profile.layout {
            SourceLayout::Verses => self.assemble(&lines),
            SourceLayout::Delimited {
                delimiter,
                book_ids,
            } => read_delimited(&lines, *delimiter, book_ids),
            SourceLayout::ChapterVerse => read_chapter_verse(&lines, &self.profile),
        };
        self.emit(scan)
    }

    /// Classify and assemble free-form verse lines.
    pub fn assemble(&self, lines: &[String]) -> SourceScan {
        let mut assembler = VerseAssembler::new(&self.profile);
        let mut blocks = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let class = self.classify_at(lines, i, &assembler);
            trace!(line = i + 1, %class, "classified");
            blocks.extend(assembler.process(class));
        }
        blocks.extend(assembler.finish());
        SourceScan { blocks, skipped: 0 }
    }

    /// Every prepared line of a source with its class, as the assembler sees it.
    pub fn classify_str(&self, source: &str) -> Vec<ClassifiedLine> {
        let lines = self.prepare(source);
        let mut assembler = VerseAssembler::new(&self.profile);
        let mut classified = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let (rule, _) = self.classifier.matching_rule(line);
            let class = self.classify_at(&lines, i, &assembler);
            let shown = match &class {
                LineClass::BookChapterHeader { book, chapter }
                    if assembler.is_running_header(book, *chapter) =>
                {
                    LineClass::Noise(NoiseKind::RunningHeader)
                }
                class => class.clone(),
            };
            assembler.process(class);
            classified.push(ClassifiedLine {
                number: i + 1,
                line: line.clone(),
                rule,
                class: shown,
            });
        }
        classified
    }

    fn prepare(&self, source: &str) -> Vec<String> {
        let inline_markers =
            self.profile.layout == SourceLayout::Verses && self.profile.verses.inline_markers;
        prepare_lines(source, inline_markers)
    }

    fn classify_at(&self, lines: &[String], i: usize, assembler: &VerseAssembler) -> LineClass {
        let context = ClassifyContext {
            prev: i.checked_sub(1).map(|j| lines[j].as_str()),
            next: lines.get(i + 1).map(String::as_str),
            cursor: assembler.cursor(),
        };
        self.classifier.classify(&lines[i], &context)
    }

    fn emit(&self, scan: SourceScan) -> Conversion {
        let mut conversion = Conversion {
            skipped: scan.skipped,
            ..Conversion::default()
        };
        for block in scan.blocks {
            self.push_block(&mut conversion, block);
        }
        debug!(
            profile = %self.profile.name,
            records = conversion.records.len(),
            sentences = conversion.sentences.len(),
            "converted source"
        );
        conversion
    }

    fn push_block(&self, conversion: &mut Conversion, block: VerseBlock) {
        let clean = self.normalizer.clean(&block.text);
        for verse in &block.verses {
            conversion.records.push(VerseRecord::new(
                block.book.clone(),
                block.chapter.clone(),
                verse.to_string(),
                clean.text.clone(),
            ));
        }
        conversion.sentences.extend(clean.sentences);
    }
}
