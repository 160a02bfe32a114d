use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use csv::ReaderBuilder;

use sleep_model::{CellValue, SourceRecord, SourceSchema, SourceTable};

use crate::error::{IngestError, Result};

/// Raw header and string rows of a CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Header names that appear more than once, in first-seen order.
    pub fn duplicate_headers(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for header in &self.headers {
            if !seen.insert(header.as_str()) && !duplicates.contains(&header.as_str()) {
                duplicates.push(header.as_str());
            }
        }
        duplicates
    }

    /// Converts the string rows into schema-tagged source records.
    ///
    /// A repeated header keeps the cell of its first column.
    pub fn into_source_table(self, schema: SourceSchema) -> SourceTable {
        let mut table = SourceTable::new(schema, self.headers.clone());
        for (idx, row) in self.rows.into_iter().enumerate() {
            let mut cells = BTreeMap::new();
            for (header, value) in self.headers.iter().zip(row.iter()) {
                cells
                    .entry(header.clone())
                    .or_insert_with(|| CellValue::from_raw(value));
            }
            table.push_row(SourceRecord {
                line: idx as u64 + 1,
                cells,
            });
        }
        table
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    if let csv::ErrorKind::Io(io) = source.kind() {
        if io.kind() == std::io::ErrorKind::NotFound {
            return IngestError::FileNotFound {
                path: path.to_path_buf(),
            };
        }
    }
    IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads a headed CSV file. Blank lines are skipped and short rows are
/// padded with empty cells so every row matches the header width.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| csv_error(path, error))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| csv_error(path, error))?
        .iter()
        .map(normalize_header)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| csv_error(path, error))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            row.push(record.get(idx).map(normalize_cell).unwrap_or_default());
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}
