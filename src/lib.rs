//! # verse-corpus
//!
//! Turns raw scripture text dumps into verse tables, sentence lists and parallel corpora.
//!
//! The work happens in [`scripture`]: lines are classified, assembled into verse blocks,
//! normalized and written out as tables. A single pipeline serves every language; the
//! per-language differences live in [language profiles](scripture::profile).

pub mod scripture;
