//! Comma separated tables.

use std::fs::File;
use std::io;
use std::path::Path;

use super::ensure_parent_dir;
use super::registry::TableFormat;
use super::table::{Cell, Table};
use crate::scripture::error::{CorpusError, Result};

pub struct CsvFormat;

impl TableFormat for CsvFormat {
    fn name(&self) -> &str {
        "csv"
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn description(&self) -> &str {
        "Comma separated values with a header row"
    }

    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let file = File::create(path).map_err(|source| CorpusError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        write_csv(table, file)
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let file = File::open(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        read_csv(file)
    }
}

/// Render a table as csv text.
pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_csv<W: io::Write>(table: &Table, destination: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(destination);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn read_csv<R: io::Read>(source: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{FEFF}').trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| Cell::text(field.trim())).collect());
    }
    Ok(Table { headers, rows })
}
