//! Delimited text ⇄ in-memory table.
//!
//! A [`Table`] is an ordered header row plus string cells, the shape every
//! column operation in [`crate::transform`] works on. Files are read and
//! written as UTF-8 with `;` as the default delimiter.

use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Delimiter used by the recruitment exports.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Column-addressable table of string cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from headers and rows of equal width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Rename a header in place. Returns `false` if `from` is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace a column's values, appending the column when it does not exist.
    ///
    /// `values` must have exactly one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        assert_eq!(values.len(), self.rows.len(), "column length must match row count");
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Apply `f` to every cell of a column.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&str) -> String,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Deserialize every row into `T`, matching fields by header name.
    pub fn records<T: DeserializeOwned>(&self) -> CsvResult<Vec<T>> {
        let headers = csv::StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                csv::StringRecord::from(row.clone())
                    .deserialize(Some(&headers))
                    .map_err(|e| CsvError::Deserialize {
                        // header is line 1
                        line: i as u64 + 2,
                        message: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Parse delimited text from a reader.
///
/// The first record is the header row, kept verbatim. Ragged rows and
/// invalid UTF-8 are errors; empty lines are skipped.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> CsvResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::EmptyFile);
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Parse a CSV file.
pub fn read_table_file<P: AsRef<Path>>(path: P, delimiter: u8) -> CsvResult<Table> {
    let file = std::fs::File::open(path.as_ref())?;
    read_table(file, delimiter)
}

/// Serialize a table with a header row and no index column.
pub fn write_table<W: Write>(table: &Table, writer: W, delimiter: u8) -> CsvResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(table.headers())
        .map_err(|e| CsvError::Write(e.to_string()))?;
    for row in table.rows() {
        wtr.write_record(row)
            .map_err(|e| CsvError::Write(e.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a table to a file, replacing any existing content.
pub fn write_table_file<P: AsRef<Path>>(table: &Table, path: P, delimiter: u8) -> CsvResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_table(table, file, delimiter)
}

/// Format delimiter for display
pub fn format_delimiter(d: u8) -> String {
    match d {
        b'\t' => "TAB".to_string(),
        c => (c as char).to_string(),
    }
}
