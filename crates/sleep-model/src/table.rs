#![deny(unsafe_code)]

use std::collections::BTreeMap;

use crate::SourceSchema;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    /// Builds a cell from raw text; blank text is missing.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value.as_str()),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// One raw input row, keyed by native column name.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SourceRecord {
    /// Record number within the parsed input (1-based, excluding header).
    pub line: u64,
    pub cells: BTreeMap<String, CellValue>,
}

impl SourceRecord {
    /// Text of a column, or `None` when the column is absent or the cell is blank.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(CellValue::as_text)
    }
}

/// A fully loaded source file tagged with its schema.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SourceTable {
    pub schema: SourceSchema,
    /// Native column names in file order.
    pub columns: Vec<String>,
    pub rows: Vec<SourceRecord>,
}

impl SourceTable {
    pub fn new(schema: SourceSchema, columns: Vec<String>) -> Self {
        Self {
            schema,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: SourceRecord) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
