//! JSON tables: an array of objects keyed by column name, in column order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::ensure_parent_dir;
use super::registry::TableFormat;
use super::table::{Cell, Table};
use crate::scripture::error::{CorpusError, Result};

pub struct JsonFormat;

struct JsonRow<'a> {
    headers: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (i, header) in self.headers.iter().enumerate() {
            match self.cells.get(i) {
                Some(Cell::Number(n)) if n.fract() == 0.0 => map.serialize_entry(header, &(*n as i64))?,
                Some(Cell::Number(n)) => map.serialize_entry(header, n)?,
                Some(Cell::Text(text)) => map.serialize_entry(header, text)?,
                None => map.serialize_entry(header, "")?,
            }
        }
        map.end()
    }
}

impl TableFormat for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn description(&self) -> &str {
        "Array of row objects"
    }

    fn write(&self, table: &Table, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let write_error = |source| CorpusError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_error)?;
        let rows: Vec<JsonRow> = table
            .rows
            .iter()
            .map(|cells| JsonRow {
                headers: &table.headers,
                cells,
            })
            .collect();
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writer.write_all(b"\n").map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let file = File::open(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let objects: Vec<serde_json::Map<String, Value>> =
            serde_json::from_reader(BufReader::new(file))?;

        let mut headers: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
        let rows = objects
            .iter()
            .map(|object| {
                headers
                    .iter()
                    .map(|header| value_to_cell(object.get(header)))
                    .collect()
            })
            .collect();
        Ok(Table { headers, rows })
    }
}

fn value_to_cell(value: Option<&Value>) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::text(""),
        Some(Value::String(text)) => Cell::text(text.trim()),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::text(n.to_string())),
        Some(other) => Cell::text(other.to_string()),
    }
}
