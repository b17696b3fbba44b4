//! Main module for verse-corpus functionality
//!
//! Pipeline stages, in the order data flows through them:
//!
//!     lexing        raw lines -> prepared lines -> [LineClass](token::LineClass)
//!     assembling    classified lines -> [VerseBlock](assembling::VerseBlock)
//!     normalization verse text -> normalized text and sentences
//!     formats       records -> xlsx / csv / json tables and the sentence file
//!     alignment     two verse tables -> parallel corpus
//!
//! [sources] covers the dumps that are already split into fields, and [pipeline] picks the
//! right path for a profile. [processor] is the file-level API used by the binary.

pub mod alignment;
pub mod assembling;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod normalization;
pub mod pipeline;
pub mod processor;
pub mod profile;
pub mod record;
pub mod sources;
pub mod token;

pub use error::{CorpusError, Result};
pub use record::{ParallelRow, VerseRecord};
