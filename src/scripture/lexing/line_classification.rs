//! Line Classification
//!
//! Each prepared line is matched against an ordered list of rules; the first rule that
//! recognises the line decides its [LineClass]. Rules are plain functions of the line and
//! the compiled profile, so each can be tested on its own. Lines no rule claims are
//! continuation text.
//!
//! A line holding only a number is ambiguous under the `heuristic` policy: it may be a verse
//! number printed on its own line or a page number. [resolve_bare_number] settles it from the
//! neighbouring lines and the scan cursor:
//!
//!     1. a header right before or after the number, or profile noise right after it => page number
//!     2. the number is the next expected verse of a known chapter => verse
//!     3. the next line reads like prose => verse
//!     4. otherwise => page number

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scripture::assembling::ScanCursor;
use crate::scripture::error::{CorpusError, Result};
use crate::scripture::lexing::base_tokenization::tokenize;
use crate::scripture::profile::{BareNumberPolicy, LanguageProfile};
use crate::scripture::token::{LineClass, NoiseKind, Token, VerseId};

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static CROSS_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*:\d").unwrap());
static PARENTHETICAL_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\([^)]*\)$").unwrap());
static SINGLE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{L}$").unwrap());

/// Lines following a bare number must be longer than this to count as prose.
const PROSE_MIN_CHARS: usize = 6;

/// Longest number (in digits) read as a verse number.
pub(crate) const MAX_VERSE_DIGITS: usize = 3;

/// Widest `N-M` range expanded into one record per verse.
const MAX_RANGE_SPAN: u32 = 50;

type Rule = fn(&LineClassifier, &str) -> Option<LineClass>;

/// Classification rules, in precedence order.
const RULES: &[(&str, Rule)] = &[
    ("blank", blank),
    ("profile-noise", profile_noise),
    ("cross-reference", cross_reference),
    ("fragment", fragment),
    ("chapter-keyword", chapter_keyword),
    ("book-header", book_header),
    ("bare-number", bare_number),
    ("verse-range", verse_range),
    ("verse-start", verse_start),
];

/// Neighbourhood of a line, used to resolve bare numbers.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub prev: Option<&'a str>,
    pub next: Option<&'a str>,
    pub cursor: &'a ScanCursor,
}

/// Line classifier compiled from a language profile.
pub struct LineClassifier {
    profile: LanguageProfile,
    book_header: Option<Regex>,
    chapter_keyword: Option<Regex>,
    noise_patterns: Vec<Regex>,
}

impl LineClassifier {
    pub fn new(profile: &LanguageProfile) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| CorpusError::Pattern {
                profile: profile.name.clone(),
                source,
            })
        };

        let mut aliases: Vec<&str> = profile.book_aliases().map(|(alias, _)| alias).collect();
        aliases.sort_by_key(|alias| std::cmp::Reverse(alias.len()));
        let book_header = if aliases.is_empty() {
            None
        } else {
            let alternation = aliases
                .iter()
                .map(|alias| regex::escape(alias).replace(' ', r"\s+"))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(
                r"(?i)^({})\b\s*(\d+)?[\s\d,:.\-\u{{2013}}]*$",
                alternation
            ))?)
        };

        let chapter_keyword = if profile.chapter_keywords.is_empty() {
            None
        } else {
            let alternation = profile
                .chapter_keywords
                .iter()
                .map(|keyword| regex::escape(keyword))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"(?i)^(?:{})\s+(\d+)\b", alternation))?)
        };

        let noise_patterns = profile
            .noise
            .patterns
            .iter()
            .map(|pattern| compile(pattern.as_str()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            profile: profile.clone(),
            book_header,
            chapter_keyword,
            noise_patterns,
        })
    }

    /// Classify a line on its own. Bare numbers stay [LineClass::NumericAmbiguous].
    pub fn classify_line(&self, line: &str) -> LineClass {
        self.matching_rule(line).1
    }

    /// The first rule that claims `line`, with its result.
    pub fn matching_rule(&self, line: &str) -> (&'static str, LineClass) {
        let line = line.trim();
        RULES
            .iter()
            .find_map(|(name, rule)| rule(self, line).map(|class| (*name, class)))
            .unwrap_or_else(|| ("continuation", LineClass::Continuation(line.to_string())))
    }

    /// Classify a line within its neighbourhood, resolving bare numbers.
    pub fn classify(&self, line: &str, context: &ClassifyContext) -> LineClass {
        match self.classify_line(line) {
            LineClass::NumericAmbiguous(n) => resolve_bare_number(self, n, context),
            class => class,
        }
    }

    /// Whether a line is a book or chapter header.
    pub fn is_header(&self, line: &str) -> bool {
        let line = line.trim();
        chapter_keyword(self, line).is_some() || book_header(self, line).is_some()
    }
}

/// Decide whether a bare number is a verse number or a page number.
pub fn resolve_bare_number(
    classifier: &LineClassifier,
    n: u32,
    context: &ClassifyContext,
) -> LineClass {
    let is_header = |line: Option<&str>| line.is_some_and(|line| classifier.is_header(line));
    let footer_next = context
        .next
        .is_some_and(|next| profile_noise(classifier, next.trim()).is_some());
    if is_header(context.prev) || is_header(context.next) || footer_next {
        return LineClass::Noise(NoiseKind::PageNumber);
    }

    let cursor = context.cursor;
    let expected =
        cursor.last_verse.checked_add(1) == Some(n) || (cursor.last_verse == 0 && n == 1);
    if cursor.chapter.is_some() && expected {
        return bare_verse(n);
    }

    let next_is_prose = context.next.is_some_and(|next| {
        let next = next.trim();
        !BARE_NUMBER.is_match(next)
            && !classifier.is_header(next)
            && next.chars().count() > PROSE_MIN_CHARS
    });
    if next_is_prose {
        return bare_verse(n);
    }

    LineClass::Noise(NoiseKind::PageNumber)
}

fn bare_verse(n: u32) -> LineClass {
    LineClass::VerseStart {
        verse: VerseId::Number(n),
        text: String::new(),
    }
}

fn blank(_: &LineClassifier, line: &str) -> Option<LineClass> {
    line.is_empty().then_some(LineClass::Noise(NoiseKind::Blank))
}

fn profile_noise(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    let noise = &classifier.profile.noise;
    let matched = noise.contains.iter().any(|marker| line.contains(marker.as_str()))
        || noise.exact.iter().any(|exact| exact == line)
        || classifier.noise_patterns.iter().any(|re| re.is_match(line));
    matched.then_some(LineClass::Noise(NoiseKind::Footer))
}

/// A heading carrying a cross reference. Verse lines quoting one keep their verse; the
/// normalizer removes the parenthetical.
fn cross_reference(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    let verses = &classifier.profile.verses;
    let heading = verses.drop_reference_lines
        && CROSS_REFERENCE.is_match(line)
        && parse_verse_marker(line, verses.sub_verses).is_none();
    heading.then_some(LineClass::Noise(NoiseKind::CrossReference))
}

fn fragment(_: &LineClassifier, line: &str) -> Option<LineClass> {
    (PARENTHETICAL_ONLY.is_match(line) || SINGLE_LETTER.is_match(line))
        .then_some(LineClass::Noise(NoiseKind::Fragment))
}

fn chapter_keyword(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    let captures = classifier.chapter_keyword.as_ref()?.captures(line)?;
    let chapter = captures[1].parse().ok()?;
    Some(LineClass::ChapterHeader(chapter))
}

fn book_header(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    let captures = classifier.book_header.as_ref()?.captures(line)?;
    let spelling = captures[1].split_whitespace().collect::<Vec<_>>().join(" ");
    let book = classifier.profile.canonical_book(&spelling)?.to_string();
    let chapter = captures.get(2).and_then(|m| m.as_str().parse().ok());
    Some(LineClass::BookChapterHeader { book, chapter })
}

fn bare_number(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    if !BARE_NUMBER.is_match(line) {
        return None;
    }
    let n = match line.parse::<u32>() {
        Ok(n) if line.len() <= MAX_VERSE_DIGITS => n,
        _ => return Some(LineClass::Noise(NoiseKind::PageNumber)),
    };
    Some(match classifier.profile.bare_numbers {
        BareNumberPolicy::Heuristic => LineClass::NumericAmbiguous(n),
        BareNumberPolicy::Chapter => LineClass::ChapterHeader(n),
        BareNumberPolicy::Noise => LineClass::Noise(NoiseKind::PageNumber),
    })
}

fn verse_range(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    match parse_verse_marker(line, classifier.profile.verses.sub_verses)? {
        range @ LineClass::VerseRange { .. } => Some(range),
        _ => None,
    }
}

fn verse_start(classifier: &LineClassifier, line: &str) -> Option<LineClass> {
    match parse_verse_marker(line, classifier.profile.verses.sub_verses)? {
        start @ LineClass::VerseStart { .. } => Some(start),
        _ => None,
    }
}

/// Read a leading verse marker: `N`, `Na`, `N-M`, `Na-Mb`, optionally followed by `.` or `:`.
/// Numbers longer than [MAX_VERSE_DIGITS] are not verse markers.
fn parse_verse_marker(line: &str, sub_verses: bool) -> Option<LineClass> {
    let tokens = tokenize(line);
    let (Token::Number(first), _) = tokens.first()? else {
        return None;
    };
    if first.len() > MAX_VERSE_DIGITS {
        return None;
    }
    let start: u32 = first.parse().ok()?;
    let mut i = 1;

    let letter = sub_verse_letter(&tokens, i, sub_verses);
    if letter.is_some() {
        i += 1;
    }

    if matches!(tokens.get(i), Some((Token::Dash, _))) {
        if let Some((Token::Number(last), _)) = tokens.get(i + 1) {
            if let Ok(end) = last.parse::<u32>() {
                let mut j = i + 2;
                if sub_verse_letter(&tokens, j, sub_verses).is_some() {
                    j += 1;
                }
                let text = rest_of_line(line, &tokens, j);
                if end < start || end - start > MAX_RANGE_SPAN {
                    return Some(LineClass::VerseStart {
                        verse: VerseId::Number(start),
                        text,
                    });
                }
                return Some(LineClass::VerseRange { start, end, text });
            }
        }
    }

    if matches!(tokens.get(i), Some((Token::Period | Token::Colon, _))) {
        i += 1;
    }

    let verse = match letter {
        Some(letter) => VerseId::Lettered(start, letter),
        None => VerseId::Number(start),
    };
    Some(LineClass::VerseStart {
        verse,
        text: rest_of_line(line, &tokens, i),
    })
}

/// The sub-verse letter at `i`, when it stands alone (followed by space, dash or the end).
fn sub_verse_letter(tokens: &[(Token, logos::Span)], i: usize, enabled: bool) -> Option<char> {
    if !enabled {
        return None;
    }
    let (token, _) = tokens.get(i)?;
    if !token.is_sub_verse_letter() {
        return None;
    }
    let standalone = match tokens.get(i + 1) {
        None => true,
        Some((next, _)) => next.is_whitespace() || *next == Token::Dash,
    };
    match token {
        Token::Word(word) if standalone => word.chars().next(),
        _ => None,
    }
}

fn rest_of_line(line: &str, tokens: &[(Token, logos::Span)], i: usize) -> String {
    tokens
        .get(i)
        .map(|(_, span)| line[span.start..].trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripture::profile::ProfileRegistry;

    fn classifier(name: &str) -> LineClassifier {
        let registry = ProfileRegistry::with_defaults().unwrap();
        LineClassifier::new(registry.get(name).unwrap()).unwrap()
    }

    #[test]
    fn first_matching_rule_wins() {
        let bikolano = classifier("bikolano");
        assert_eq!(bikolano.matching_rule("").0, "blank");
        assert_eq!(bikolano.matching_rule("© 2012 Philippine Bible Society").0, "profile-noise");
        assert_eq!(bikolano.matching_rule("Si Jesus (Mt. 27:1-2)").0, "cross-reference");
        assert_eq!(bikolano.matching_rule("Mateo 2").0, "book-header");
        assert_eq!(bikolano.matching_rule("Kan primer").0, "continuation");
    }

    #[test]
    fn book_header_reports_canonical_name() {
        let hiligaynon = classifier("hiligaynon");
        assert_eq!(
            hiligaynon.classify_line("Lukas 3"),
            LineClass::BookChapterHeader {
                book: "LUCAS".to_string(),
                chapter: Some(3)
            }
        );
        assert_eq!(
            hiligaynon.classify_line("MATEO"),
            LineClass::BookChapterHeader {
                book: "MATEO".to_string(),
                chapter: None
            }
        );
    }

    #[test]
    fn book_name_followed_by_prose_is_not_a_header() {
        let hiligaynon = classifier("hiligaynon");
        assert!(matches!(
            hiligaynon.classify_line("Mark said to them"),
            LineClass::Continuation(_)
        ));
    }

    #[test]
    fn multi_word_book_names() {
        let ilocano = classifier("ilocano");
        assert_eq!(
            ilocano.classify_line("San  Lucas 4"),
            LineClass::BookChapterHeader {
                book: "San Lucas".to_string(),
                chapter: Some(4)
            }
        );
    }

    #[test]
    fn sub_verse_letters_need_the_profile_flag() {
        let waray = classifier("waray");
        assert_eq!(
            waray.classify_line("6a Hin pagkita"),
            LineClass::VerseStart {
                verse: VerseId::Lettered(6, 'a'),
                text: "Hin pagkita".to_string()
            }
        );
        let hiligaynon = classifier("hiligaynon");
        assert_eq!(
            hiligaynon.classify_line("6a Hin pagkita"),
            LineClass::VerseStart {
                verse: VerseId::Number(6),
                text: "a Hin pagkita".to_string()
            }
        );
    }

    #[test]
    fn lettered_range_drops_letters() {
        let waray = classifier("waray");
        assert_eq!(
            waray.classify_line("6b-7 Ngan"),
            LineClass::VerseRange {
                start: 6,
                end: 7,
                text: "Ngan".to_string()
            }
        );
    }

    #[test]
    fn chavacano_bare_numbers_are_chapters() {
        let chavacano = classifier("chavacano");
        assert_eq!(chavacano.classify_line("12"), LineClass::ChapterHeader(12));
        assert_eq!(
            chavacano.classify_line("Mateo 1, 2"),
            LineClass::Noise(NoiseKind::Footer)
        );
    }

    #[test]
    fn resolves_bare_numbers_from_context() {
        let hiligaynon = classifier("hiligaynon");
        let cursor = ScanCursor {
            book: Some("MATEO".to_string()),
            chapter: Some(1),
            last_verse: 4,
            sequence_index: 1,
        };

        let after_header = ClassifyContext {
            prev: Some("Chapter 1"),
            next: Some("Kag si Jesus"),
            cursor: &cursor,
        };
        assert_eq!(
            hiligaynon.classify("5", &after_header),
            LineClass::Noise(NoiseKind::PageNumber)
        );

        let expected = ClassifyContext {
            prev: Some("tawo"),
            next: Some("Kag"),
            cursor: &cursor,
        };
        assert_eq!(hiligaynon.classify("5", &expected), bare_verse(5));

        let prose = ClassifyContext {
            prev: Some("tawo"),
            next: Some("Kag si Jesus nagkadto"),
            cursor: &cursor,
        };
        assert_eq!(hiligaynon.classify("9", &prose), bare_verse(9));

        let nothing = ClassifyContext {
            prev: Some("tawo"),
            next: Some("12"),
            cursor: &cursor,
        };
        assert_eq!(
            hiligaynon.classify("9", &nothing),
            LineClass::Noise(NoiseKind::PageNumber)
        );
    }

    #[test]
    fn verse_lines_quoting_a_cross_reference_keep_their_verse() {
        for name in ["bikolano", "waray", "bicolano", "ilocano"] {
            let classifier = classifier(name);
            assert_eq!(
                classifier.classify_line("1 Kan primer (Gen. 1:1) na panahon"),
                LineClass::VerseStart {
                    verse: VerseId::Number(1),
                    text: "Kan primer (Gen. 1:1) na panahon".to_string(),
                },
                "{name}"
            );
            assert_eq!(
                classifier.classify_line("Si Jesus (Mt. 27:1-2)"),
                LineClass::Noise(NoiseKind::CrossReference),
                "{name}"
            );
        }
    }

    #[test]
    fn bare_number_before_a_footer_is_a_page_number() {
        let yami = classifier("yami");
        let cursor = ScanCursor {
            book: Some("Matay".to_string()),
            chapter: Some(1),
            last_verse: 1,
            sequence_index: 1,
        };
        let context = ClassifyContext {
            prev: Some("1 Ko kavos"),
            next: Some("Seysyo No Tao 2015"),
            cursor: &cursor,
        };
        assert_eq!(
            yami.classify("152", &context),
            LineClass::Noise(NoiseKind::PageNumber)
        );
    }

    #[test]
    fn last_verse_at_the_top_of_the_range_does_not_overflow() {
        let hiligaynon = classifier("hiligaynon");
        let cursor = ScanCursor {
            book: Some("MATEO".to_string()),
            chapter: Some(1),
            last_verse: u32::MAX,
            sequence_index: 1,
        };
        let context = ClassifyContext {
            prev: Some("tawo"),
            next: Some("Kag"),
            cursor: &cursor,
        };
        assert_eq!(
            hiligaynon.classify("5", &context),
            LineClass::Noise(NoiseKind::PageNumber)
        );
    }

    #[test]
    fn long_numbers_and_wide_ranges_are_not_verse_ranges() {
        let bikolano = classifier("bikolano");
        assert_eq!(
            bikolano.classify_line("1905-2005 An ginikanan"),
            LineClass::Continuation("1905-2005 An ginikanan".to_string())
        );
        assert_eq!(
            bikolano.classify_line("4294967295 x"),
            LineClass::Continuation("4294967295 x".to_string())
        );
        assert_eq!(
            bikolano.classify_line("1-4000000000 An"),
            LineClass::VerseStart {
                verse: VerseId::Number(1),
                text: "An".to_string(),
            }
        );
        assert_eq!(
            bikolano.classify_line("3-7 An"),
            LineClass::VerseRange {
                start: 3,
                end: 7,
                text: "An".to_string(),
            }
        );
    }
}
