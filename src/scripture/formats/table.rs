//! The interchange table shared by every format.

use std::fmt;

use crate::scripture::record::{ParallelRow, TableLayout, VerseRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// A key cell: numbers stay numbers so spreadsheets sort them numerically.
    pub fn key(value: &str) -> Self {
        match value.parse::<u32>() {
            Ok(n) => Cell::Number(f64::from(n)),
            Err(_) => Cell::Text(value.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_records(records: &[VerseRecord], layout: TableLayout) -> Self {
        let mut table = Self::new(layout.headers());
        for record in records {
            let row = match layout {
                TableLayout::Split => vec![
                    Cell::text(&record.book),
                    Cell::key(&record.chapter),
                    Cell::key(&record.verse),
                    Cell::text(&record.text),
                ],
                TableLayout::Combined => vec![
                    Cell::text(&record.book),
                    Cell::text(record.chapter_verse()),
                    Cell::text(&record.text),
                ],
            };
            table.rows.push(row);
        }
        table
    }

    pub fn from_parallel(rows: &[ParallelRow], left_label: &str, right_label: &str) -> Self {
        let left = format!("Text_{}", left_label);
        let right = format!("Text_{}", right_label);
        let mut table = Self::new(&["Book", "Chapter", "Verse", left.as_str(), right.as_str()]);
        for row in rows {
            table.rows.push(vec![
                Cell::text(&row.book),
                Cell::key(&row.chapter),
                Cell::key(&row.verse),
                Cell::text(&row.left),
                Cell::text(&row.right),
            ]);
        }
        table
    }

    /// Index of a column, matched case-insensitively.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    }

    /// Cell text at `row`/`column`; missing cells read as empty.
    pub fn value(&self, row: usize, column: usize) -> String {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|cell| cell.to_string())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Cell::Number(12.0).to_string(), "12");
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
        assert_eq!(Cell::key("6a"), Cell::Text("6a".to_string()));
    }

    #[test]
    fn combined_layout_joins_chapter_and_verse() {
        let records = vec![VerseRecord::new("Mateo", "1", "2", "Iyo na ini an")];
        let table = Table::from_records(&records, TableLayout::Combined);
        assert_eq!(table.headers, vec!["Book", "ChapterVerse", "Text"]);
        assert_eq!(table.value(0, 1), "1:2");
    }
}
