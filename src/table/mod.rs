//! # Table Module
//!
//! In-memory representation of a delimited text table together with the
//! pieces needed to read one: the delimited parser, the single-slot cache,
//! spreadsheet-style column references and the row/column extractor.
use thiserror::Error;

pub(crate) mod cache;
pub(crate) mod extract;
pub(crate) mod parser;
pub(crate) mod reference;

/// Errors raised while locating or interpreting a table source.
#[derive(Error, Debug)]
pub(crate) enum TableError {
    /// Path does not reference an existing file
    #[error("File not found: {0}")]
    SourceNotFoundError(String),

    /// File extension is not the supported delimited-text extension
    #[error("Unsupported file extension: '{0}'. Only .csv is supported.")]
    UnsupportedFormatError(String),

    /// Orientation name is not one of the known orientations
    #[error("Unknown orientation '{0}'")]
    UnknownOrientationError(String),

    /// Specific-columns orientation was requested without any column
    #[error("No column reference given for specific columns orientation")]
    MissingColumnReferenceError,
}

/// A parsed table: rows of string cells. Rows may have different lengths.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(rows: Vec<Vec<String>>) -> Self {
        Table { rows }
    }

    /// Number of rows.
    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the width of the first row.
    /// A table whose first row is empty has no columns.
    pub(crate) fn column_count(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    pub(crate) fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(|cells| cells.as_slice())
    }

    /// Returns the cell at (row, col), or an empty string for cells past the end of a short row.
    pub(crate) fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(|cell| cell.as_str())
            .unwrap_or("")
    }

    /// Iterates over one column from top to bottom, yielding "" for missing cells.
    pub(crate) fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |cells| cells.get(col).map(|cell| cell.as_str()).unwrap_or(""))
    }
}
