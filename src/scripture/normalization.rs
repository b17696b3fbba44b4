//! Text normalization
//!
//! Verse text leaves the assembler with markup, cross references, punctuation and digits
//! still in it. [TextNormalizer] strips all of that down to the letters of the profile's
//! alphabet separated by single spaces. Normalizing normalized text changes nothing.
//!
//! Sentence splitting happens on the raw text, before punctuation is removed; once the
//! punctuation is gone the sentence boundaries cannot be recovered.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scripture::assembling::collapse_whitespace;
use crate::scripture::profile::NormalizeRules;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Normalized verse text and the sentences it contributes to the sentence file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanText {
    pub text: String,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    rules: NormalizeRules,
}

impl TextNormalizer {
    pub fn new(rules: &NormalizeRules) -> Self {
        Self {
            rules: rules.clone(),
        }
    }

    /// Strip markup, parentheticals and every character outside the alphabet.
    pub fn normalize(&self, text: &str) -> String {
        let stripped = self.strip_markup(text);
        self.filter_letters(&stripped)
    }

    /// Split on runs of `.`, `!` and `?`, normalizing each fragment. Empty fragments are dropped.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let stripped = self.strip_markup(text);
        SENTENCE_END
            .split(&stripped)
            .map(|fragment| self.filter_letters(fragment))
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    /// Record text and sentence lines for one verse block.
    pub fn clean(&self, text: &str) -> CleanText {
        if self.rules.sentence_split {
            let sentences = self.split_sentences(text);
            CleanText {
                text: sentences.join(" "),
                sentences,
            }
        } else {
            let text = self.normalize(text);
            let sentences = if text.is_empty() {
                Vec::new()
            } else {
                vec![text.clone()]
            };
            CleanText { text, sentences }
        }
    }

    fn strip_markup(&self, text: &str) -> String {
        let text = TAG.replace_all(text, "");
        let text = PARENTHETICAL.replace_all(&text, "");
        let text = if self.rules.strip_brackets {
            BRACKETED.replace_all(&text, "").into_owned()
        } else {
            text.into_owned()
        };
        collapse_whitespace(&text)
    }

    fn filter_letters(&self, text: &str) -> String {
        let alphabet = self.rules.alphabet;
        let kept: String = text
            .chars()
            .filter(|&c| c.is_whitespace() || alphabet.allows(c))
            .collect();
        let collapsed = collapse_whitespace(&kept);
        if self.rules.dedupe_repeated_words {
            dedupe_repeated_words(&collapsed)
        } else {
            collapsed
        }
    }
}

/// Collapse immediately repeated words, ignoring case: `sa Sa sa bata` -> `sa bata`.
fn dedupe_repeated_words(text: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    for word in text.split(' ') {
        let repeated = words
            .last()
            .is_some_and(|last| last.to_lowercase() == word.to_lowercase());
        if !repeated {
            words.push(word);
        }
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripture::profile::Alphabet;

    fn normalizer(alphabet: Alphabet) -> TextNormalizer {
        TextNormalizer::new(&NormalizeRules {
            alphabet,
            ..NormalizeRules::default()
        })
    }

    #[test]
    fn strips_tags_parentheticals_and_punctuation() {
        let text = "Kan <i>primer</i> na panahon (Gen. 1:1), an Tataramon...";
        assert_eq!(
            normalizer(Alphabet::Ascii).normalize(text),
            "Kan primer na panahon an Tataramon"
        );
    }

    #[test]
    fn accented_alphabet_keeps_diacritics() {
        let text = "¡Señor, ayúdanos! 12";
        assert_eq!(normalizer(Alphabet::Accented).normalize(text), "Señor ayúdanos");
        assert_eq!(normalizer(Alphabet::Ascii).normalize(text), "Seor aydanos");
    }

    #[test]
    fn brackets_only_stripped_on_request() {
        let rules = NormalizeRules {
            strip_brackets: true,
            ..NormalizeRules::default()
        };
        assert_eq!(
            TextNormalizer::new(&rules).normalize("At [sinabi] niya"),
            "At niya"
        );
        assert_eq!(
            normalizer(Alphabet::Ascii).normalize("At [sinabi] niya"),
            "At sinabi niya"
        );
    }

    #[test]
    fn dedupes_repeated_words() {
        let rules = NormalizeRules {
            dedupe_repeated_words: true,
            ..NormalizeRules::default()
        };
        assert_eq!(
            TextNormalizer::new(&rules).normalize("ang ang Ang bata, bata"),
            "ang bata"
        );
    }

    #[test]
    fn splits_sentences_before_removing_punctuation() {
        let normalizer = normalizer(Alphabet::Ascii);
        assert_eq!(
            normalizer.split_sentences("Kag siya naghambal. Ano? Wala!!"),
            vec!["Kag siya naghambal", "Ano", "Wala"]
        );
    }

    #[test]
    fn clean_joins_sentences_when_splitting() {
        let rules = NormalizeRules {
            sentence_split: true,
            ..NormalizeRules::default()
        };
        let clean = TextNormalizer::new(&rules).clean("Una.Duha ka tawo.");
        assert_eq!(clean.text, "Una Duha ka tawo");
        assert_eq!(clean.sentences, vec!["Una", "Duha ka tawo"]);
    }

    #[test]
    fn clean_without_splitting_yields_one_sentence() {
        let clean = normalizer(Alphabet::Ascii).clean("Una. Duha.");
        assert_eq!(clean.text, "Una Duha");
        assert_eq!(clean.sentences, vec!["Una Duha"]);
        assert!(normalizer(Alphabet::Ascii).clean("12.").sentences.is_empty());
    }
}
