//! Properties of the text normalizer over arbitrary input.

use proptest::prelude::*;
use verse_corpus::scripture::normalization::TextNormalizer;
use verse_corpus::scripture::profile::{Alphabet, NormalizeRules};

fn alphabet() -> impl Strategy<Value = Alphabet> {
    prop_oneof![
        Just(Alphabet::Ascii),
        Just(Alphabet::Accented),
        Just(Alphabet::Unicode),
    ]
}

fn rules() -> impl Strategy<Value = NormalizeRules> {
    (alphabet(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(alphabet, sentence_split, strip_brackets, dedupe_repeated_words)| NormalizeRules {
            alphabet,
            sentence_split,
            strip_brackets,
            dedupe_repeated_words,
        },
    )
}

/// Verse-like text: words, digits, punctuation, markup and accented letters.
fn verse_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[A-Za-z]{1,8}",
            "[0-9]{1,3}",
            Just("ñ".to_string()),
            Just("ayúdanos".to_string()),
            Just("×".to_string()),
            Just(", ".to_string()),
            Just(". ".to_string()),
            Just("?! ".to_string()),
            Just("<i>".to_string()),
            Just("</i>".to_string()),
            Just("(Mat. 1:1)".to_string()),
            Just("[sinabi]".to_string()),
            Just("  \t".to_string()),
            Just(" ".to_string()),
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn normalizing_is_idempotent(rules in rules(), text in verse_text()) {
        let normalizer = TextNormalizer::new(&rules);
        let once = normalizer.normalize(&text);
        prop_assert_eq!(normalizer.normalize(&once), once.clone());
    }

    #[test]
    fn output_holds_only_alphabet_letters_and_single_spaces(
        rules in rules(),
        text in verse_text(),
    ) {
        let normalizer = TextNormalizer::new(&rules);
        let clean = normalizer.clean(&text);
        prop_assert!(clean.text.chars().all(|c| c == ' ' || rules.alphabet.allows(c)));
        prop_assert!(!clean.text.contains("  "));
        prop_assert_eq!(clean.text.trim(), clean.text.as_str());
    }

    #[test]
    fn sentences_are_non_empty_and_normalized(rules in rules(), text in verse_text()) {
        let normalizer = TextNormalizer::new(&rules);
        for sentence in normalizer.clean(&text).sentences {
            prop_assert!(!sentence.is_empty());
            prop_assert_eq!(normalizer.normalize(&sentence), sentence.clone());
        }
    }

    #[test]
    fn arbitrary_unicode_never_leaks_disallowed_characters(text in "\\PC{0,60}") {
        let normalizer = TextNormalizer::new(&NormalizeRules::default());
        let normalized = normalizer.normalize(&text);
        prop_assert!(normalized.chars().all(|c| c == ' ' || c.is_ascii_alphabetic()));
    }
}
