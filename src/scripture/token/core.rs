//! Core tokens for a single source line.

use logos::Logos;

/// Character/word level token of a scripture line.
///
/// Every character of a line belongs to exactly one token kind, so the lexer never
/// reports errors for well-formed UTF-8.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum Token {
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r"[\p{L}\p{M}]+", |lex| lex.slice().to_string())]
    Word(String),

    #[regex(r"[ \t\u{00A0}]+")]
    Whitespace,

    #[token("-")]
    #[token("\u{2013}")]
    Dash,

    #[token(":")]
    Colon,

    #[token(".")]
    Period,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r"[^0-9\p{L}\p{M} \t\u{00A0}\-\u{2013}:.,()]", |lex| lex.slice().to_string())]
    Symbol(String),
}

impl Token {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace)
    }

    /// A single lowercase ASCII letter, the shape of a sub-verse suffix (`6a`).
    pub fn is_sub_verse_letter(&self) -> bool {
        matches!(self, Token::Word(w) if w.len() == 1 && w.as_bytes()[0].is_ascii_lowercase())
    }
}
