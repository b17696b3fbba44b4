//! Line preparation
//!
//! Decodes the raw dump and yields the trimmed, non-empty lines the classifier works on.
//! Some dumps run several verses together on one line (`... sa iya. 2 Kag ...`); when the
//! profile asks for it those lines are split before each inline verse number.

use crate::scripture::lexing::base_tokenization::tokenize;
use crate::scripture::lexing::line_classification::MAX_VERSE_DIGITS;
use crate::scripture::token::Token;

const BOM: char = '\u{FEFF}';

/// Decode raw bytes as UTF-8, replacing invalid sequences and dropping a leading BOM.
pub fn decode(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let text: &str = &decoded;
    text.strip_prefix(BOM).unwrap_or(text).to_string()
}

/// Split a source into trimmed, non-empty lines.
pub fn prepare_lines(source: &str, inline_markers: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in source.lines() {
        let line = raw.replace('\r', "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if inline_markers {
            lines.extend(split_inline_markers(line));
        } else {
            lines.push(line.to_string());
        }
    }
    lines
}

/// Split a line before every ` N ` that is not at the start of the line.
fn split_inline_markers(line: &str) -> Vec<String> {
    let tokens = tokenize(line);
    let mut cuts = Vec::new();

    for (i, (token, span)) in tokens.iter().enumerate() {
        let Token::Number(digits) = token else {
            continue;
        };
        if i < 2 || digits.len() > MAX_VERSE_DIGITS {
            continue;
        }
        let after_space = tokens[i - 1].0.is_whitespace();
        let before_space = tokens.get(i + 1).is_some_and(|(next, _)| next.is_whitespace());
        if after_space && before_space {
            cuts.push(span.start);
        }
    }

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        push_piece(&mut pieces, &line[start..cut]);
        start = cut;
    }
    push_piece(&mut pieces, &line[start..]);
    pieces
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_bom_carriage_returns_and_blank_lines() {
        let source = decode(b"\xEF\xBB\xBFMateo 1\r\n\r\n  1 Kan primer  \r\n");
        assert_eq!(prepare_lines(&source, false), vec!["Mateo 1", "1 Kan primer"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let source = decode(b"1 Kan\xFF primer");
        assert_eq!(source, "1 Kan\u{FFFD} primer");
    }

    #[test]
    fn splits_before_inline_verse_numbers() {
        let lines = prepare_lines("1 Kan primer. 2 Iyo na ini 3 An", true);
        assert_eq!(lines, vec!["1 Kan primer.", "2 Iyo na ini", "3 An"]);
    }

    #[test]
    fn leaves_lines_alone_without_inline_markers() {
        let lines = prepare_lines("1 Kan primer. 2 Iyo na ini", false);
        assert_eq!(lines, vec!["1 Kan primer. 2 Iyo na ini"]);
    }

    #[test]
    fn long_numbers_and_trailing_numbers_are_not_markers() {
        let lines = prepare_lines("Chapter 12", true);
        assert_eq!(lines, vec!["Chapter 12"]);
        let lines = prepare_lines("tawo nga 5000 ka tawo", true);
        assert_eq!(lines, vec!["tawo nga 5000 ka tawo"]);
    }
}
