//! Base tokenization
//!
//! Turns one line into logos tokens paired with their byte spans.

use crate::scripture::token::Token;
use logos::Logos;

/// Tokenize a line with location information
pub fn tokenize(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}
