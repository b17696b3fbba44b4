//! Spreadsheet workbooks
//!
//! Written as xlsx with rust_xlsxwriter; the first worksheet of any workbook calamine can
//! open (xlsx, xlsm, xls, ods) is read back.

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

use super::ensure_parent_dir;
use super::registry::TableFormat;
use super::table::{Cell, Table};
use crate::scripture::error::{CorpusError, Result};

pub struct WorkbookFormat;

impl TableFormat for WorkbookFormat {
    fn name(&self) -> &str {
        "xlsx"
    }

    fn extensions(&self) -> &[&str] {
        &["xlsx", "xlsm", "xls", "ods"]
    }

    fn description(&self) -> &str {
        "Excel workbook, first worksheet"
    }

    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header)?;
        }
        for (i, row) in table.rows.iter().enumerate() {
            let row_index = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row_index, col as u16, text)?,
                    Cell::Number(n) => worksheet.write_number(row_index, col as u16, *n)?,
                };
            }
        }

        workbook.save(path)?;
        debug!(path = %path.display(), rows = table.len(), "wrote workbook");
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CorpusError::EmptyWorkbook {
                path: path.to_path_buf(),
            })??;

        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|header| header.iter().map(|cell| cell_to_string(cell).trim().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(data_to_cell).collect())
            .collect();
        Ok(Table { headers, rows })
    }
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::Text(cell_to_string(other).trim().to_string()),
    }
}

fn cell_to_string(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}
