//! Token types shared by the lexing and assembling stages.
//!
//!     Core Tokens:
//!         Character/word level tokens produced by the logos lexer for a single line. See
//!         [core]. They are only used to read verse markers and inline marker positions; the
//!         text itself is always sliced from the source line.
//!
//!     Line Classes:
//!         The classification of a whole prepared line. See [line]. [LineClass] is the
//!         definitive set of line kinds the verse assembler reacts to.

pub mod core;
pub mod line;

pub use core::Token;
pub use line::{LineClass, NoiseKind, VerseId};
