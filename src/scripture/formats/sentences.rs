//! The sentence file: UTF-8, one sentence per line, every line newline-terminated.

use std::fs;
use std::path::Path;

use super::ensure_parent_dir;
use crate::scripture::error::{CorpusError, Result};

pub fn write_sentences(path: &Path, sentences: &[String]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut content = String::with_capacity(sentences.iter().map(|s| s.len() + 1).sum());
    for sentence in sentences {
        content.push_str(sentence);
        content.push('\n');
    }
    fs::write(path, content).map_err(|source| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_sentences(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}
