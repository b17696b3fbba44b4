//! Language profiles
//!
//! A profile carries everything that differs between two source dumps: which book names
//! open a book, which lines are publisher noise, how bare numbers behave, which letters
//! survive normalization and how the dump is laid out. Profiles are YAML documents; the
//! built-in set is embedded from `profiles/` and more can be loaded from a directory or a
//! single file.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::scripture::error::{CorpusError, Result};

const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("bicolano", include_str!("../../profiles/bicolano.yaml")),
    ("bikolano", include_str!("../../profiles/bikolano.yaml")),
    ("cebuano", include_str!("../../profiles/cebuano.yaml")),
    ("chavacano", include_str!("../../profiles/chavacano.yaml")),
    ("english", include_str!("../../profiles/english.yaml")),
    ("hiligaynon", include_str!("../../profiles/hiligaynon.yaml")),
    ("ilocano", include_str!("../../profiles/ilocano.yaml")),
    ("maranao", include_str!("../../profiles/maranao.yaml")),
    ("spanish", include_str!("../../profiles/spanish.yaml")),
    ("tagalog", include_str!("../../profiles/tagalog.yaml")),
    ("waray", include_str!("../../profiles/waray.yaml")),
    ("yami", include_str!("../../profiles/yami.yaml")),
];

/// Per-language conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageProfile {
    pub name: String,
    /// Human readable language name, shown by `list-profiles`.
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub layout: SourceLayout,
    /// Book names (and their spellings) that open a book in the source.
    #[serde(default)]
    pub books: Vec<BookSpec>,
    /// Book order used when the source does not name books explicitly.
    #[serde(default)]
    pub book_sequence: Vec<String>,
    /// Words that introduce a chapter header, e.g. `Chapter` in `Chapter 3`.
    #[serde(default)]
    pub chapter_keywords: Vec<String>,
    #[serde(default)]
    pub noise: NoiseMarkers,
    #[serde(default)]
    pub bare_numbers: BareNumberPolicy,
    #[serde(default)]
    pub verses: VerseRules,
    #[serde(default)]
    pub normalize: NormalizeRules,
    /// Book name -> canonical name used when aligning two tables.
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookSpec {
    /// Canonical name written to the Book column.
    pub name: String,
    /// Other spellings found in the source.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// How the raw dump is organised.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceLayout {
    /// Free-form verse text with headers, verse numbers and continuation lines.
    #[default]
    Verses,
    /// One verse per line: `book<d>chapter<d>verse<d>text`.
    Delimited {
        delimiter: char,
        /// Book id -> book name (`40N: Matthew`).
        #[serde(default)]
        book_ids: BTreeMap<String, String>,
    },
    /// One verse per line: `chapter:verse text`, books inferred from `book_sequence`.
    ChapterVerse,
}

/// Markers of lines that never carry verse text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseMarkers {
    /// Lines containing any of these substrings.
    #[serde(default)]
    pub contains: Vec<String>,
    /// Lines equal to one of these.
    #[serde(default)]
    pub exact: Vec<String>,
    /// Lines matching one of these regular expressions.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// What a line holding nothing but a number means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BareNumberPolicy {
    /// Decide between verse number and page number from the surrounding lines.
    #[default]
    Heuristic,
    /// Always a chapter number.
    Chapter,
    /// Always a page number.
    Noise,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerseRules {
    /// Accept lettered sub-verses such as `6a`.
    pub sub_verses: bool,
    /// Verse 1 after a higher verse starts the next chapter.
    pub chapter_rollover: bool,
    /// Chapter 1 after a higher chapter starts the next book of `book_sequence`.
    pub book_rollover: bool,
    /// Unnumbered text right after a header is verse 1.
    pub implicit_first_verse: bool,
    /// Split lines at verse numbers found in the middle of the line.
    pub inline_markers: bool,
    /// Drop headings that carry a parenthetical cross reference.
    pub drop_reference_lines: bool,
    /// Also drop the unnumbered line right before such a heading.
    pub drop_reference_headings: bool,
    /// `1:1` after earlier verses starts the next book, even without a chapter change.
    pub verse_one_rollover: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeRules {
    pub alphabet: Alphabet,
    /// Split verse text into sentences on terminal punctuation.
    pub sentence_split: bool,
    /// Remove `[...]` spans along with their content.
    pub strip_brackets: bool,
    /// Collapse immediately repeated words (`the the` -> `the`).
    pub dedupe_repeated_words: bool,
}

/// Letters that survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// `A-Z` and `a-z`.
    #[default]
    Ascii,
    /// ASCII letters plus the Latin-1 and Latin Extended-A letters (`á`, `ñ`, `ü`, ...).
    Accented,
    /// Any alphabetic character.
    Unicode,
}

impl Alphabet {
    pub fn allows(self, c: char) -> bool {
        match self {
            Alphabet::Ascii => c.is_ascii_alphabetic(),
            Alphabet::Accented => {
                c.is_ascii_alphabetic()
                    || (('\u{00C0}'..='\u{017E}').contains(&c) && c != '\u{00D7}' && c != '\u{00F7}')
            }
            Alphabet::Unicode => c.is_alphabetic(),
        }
    }
}

impl LanguageProfile {
    pub fn from_yaml(origin: &str, source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|source| CorpusError::Profile {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&path.display().to_string(), &source)
    }

    /// All spellings that identify a book, paired with its canonical name.
    pub fn book_aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.books.iter().flat_map(|book| {
            std::iter::once(book.name.as_str())
                .chain(book.aliases.iter().map(String::as_str))
                .map(move |alias| (alias, book.name.as_str()))
        })
    }

    /// Canonical book name for a spelling found in the source (case-insensitive).
    pub fn canonical_book(&self, token: &str) -> Option<&str> {
        self.book_aliases()
            .find(|(alias, _)| alias.to_lowercase() == token.to_lowercase())
            .map(|(_, name)| name)
    }
}

/// Registry of language profiles
pub struct ProfileRegistry {
    profiles: HashMap<String, LanguageProfile>,
}

impl ProfileRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ProfileRegistry {
            profiles: HashMap::new(),
        }
    }

    /// Register a profile, replacing any profile of the same name
    pub fn register(&mut self, profile: LanguageProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&LanguageProfile> {
        self.profiles.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// List all profiles (sorted by name)
    pub fn list_all(&self) -> Vec<&LanguageProfile> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }

    /// Create registry with the built-in profiles
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        for (name, source) in BUILTIN_PROFILES {
            registry.register(LanguageProfile::from_yaml(&format!("builtin:{}", name), source)?);
        }
        Ok(registry)
    }

    /// Register every `*.yaml`/`*.yml` file of a directory. A missing directory is not an error.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(0);
        }
        let entries = fs::read_dir(dir).map_err(|source| CorpusError::Read {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CorpusError::Read {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if is_yaml(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let profile = LanguageProfile::from_file(path)?;
            debug!(profile = %profile.name, path = %path.display(), "loaded profile");
            self.register(profile);
        }
        Ok(paths.len())
    }

    /// Look up a profile by name, or load it when `name_or_path` points at a YAML file.
    pub fn resolve(&self, name_or_path: &str) -> Result<LanguageProfile> {
        let path = Path::new(name_or_path);
        if is_yaml(path) || path.is_file() {
            return LanguageProfile::from_file(path);
        }
        self.get(name_or_path)
            .cloned()
            .ok_or_else(|| CorpusError::UnknownProfile(name_or_path.to_string()))
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_parse() {
        let registry = ProfileRegistry::with_defaults().expect("built-in profiles to parse");
        assert_eq!(registry.list_all().len(), BUILTIN_PROFILES.len());
        for (name, _) in BUILTIN_PROFILES {
            assert!(registry.has(name), "missing built-in profile {}", name);
        }
    }

    #[test]
    fn canonical_book_matches_aliases_case_insensitively() {
        let registry = ProfileRegistry::with_defaults().unwrap();
        let hiligaynon = registry.get("hiligaynon").unwrap();
        assert_eq!(hiligaynon.canonical_book("Lukas"), Some("LUCAS"));
        assert_eq!(hiligaynon.canonical_book("mark"), Some("MARCOS"));
        assert_eq!(hiligaynon.canonical_book("Juan"), None);
    }

    #[test]
    fn minimal_profile_uses_defaults() {
        let profile = LanguageProfile::from_yaml("inline", "name: test\nlanguage: Test\n").unwrap();
        assert_eq!(profile.layout, SourceLayout::Verses);
        assert_eq!(profile.bare_numbers, BareNumberPolicy::Heuristic);
        assert_eq!(profile.normalize.alphabet, Alphabet::Ascii);
        assert!(!profile.verses.chapter_rollover);
    }

    #[test]
    fn delimited_layout_reads_delimiter_and_ids() {
        let yaml = "name: t\nlanguage: T\nlayout:\n  kind: delimited\n  delimiter: \"|\"\n  book_ids:\n    40N: Matthew\n";
        let profile = LanguageProfile::from_yaml("inline", yaml).unwrap();
        match profile.layout {
            SourceLayout::Delimited {
                delimiter,
                book_ids,
            } => {
                assert_eq!(delimiter, '|');
                assert_eq!(book_ids.get("40N").map(String::as_str), Some("Matthew"));
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = LanguageProfile::from_yaml("inline", "name: t\nlanguage: T\nbogus: 1\n");
        assert!(matches!(result, Err(CorpusError::Profile { .. })));
    }

    #[test]
    fn accented_alphabet_excludes_math_signs() {
        assert!(Alphabet::Accented.allows('ñ'));
        assert!(Alphabet::Accented.allows('É'));
        assert!(!Alphabet::Accented.allows('×'));
        assert!(!Alphabet::Ascii.allows('ñ'));
        assert!(Alphabet::Unicode.allows('ŋ'));
    }
}
