//! Lexing
//!
//!     Raw dumps reach the classifier in three steps:
//!         1. Line preparation. See [line_splitting](line_splitting). The bytes are decoded,
//!            lines trimmed and blank lines dropped. Profiles that pack several verses on one
//!            line get those lines split at the inline verse numbers.
//!
//!         2. Core tokenization using the logos lexer. See [base_tokenization](base_tokenization).
//!            Tokens keep their byte spans so verse text can be sliced out of the original line.
//!
//!         3. Line classification. See [line_classification](line_classification). An ordered
//!            list of rules turns each line into a [LineClass](crate::scripture::token::LineClass).
//!            Bare numbers are resolved against the neighbouring lines and the scan cursor.

pub mod base_tokenization;
pub mod line_classification;
pub mod line_splitting;

pub use base_tokenization::tokenize;
pub use line_classification::{resolve_bare_number, ClassifyContext, LineClassifier};
pub use line_splitting::{decode, prepare_lines};
