use crate::error::RustyCursorError;
use crate::helpers::reader::TextReader;
use crate::table::parser::parse;
use crate::table::{Table, TableError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The only file extension accepted as a table source.
pub(crate) const SUPPORTED_EXTENSION: &str = "csv";

/// Single-slot cache holding the most recently loaded table.
///
/// A request for the cached path is answered without touching the file
/// system. Loading any other path replaces the slot.
#[derive(Default)]
pub(crate) struct TableCache {
    slot: Option<(PathBuf, Arc<Table>)>,
}

impl TableCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the table at `path`, parsing it only on a cache miss.
    /// `delimiter` and `reader` are ignored when the path is already cached.
    pub(crate) fn load(
        &mut self,
        path: &Path,
        delimiter: &str,
        reader: &TextReader,
    ) -> Result<Arc<Table>, RustyCursorError> {
        if let Some((cached_path, table)) = &self.slot {
            if cached_path == path {
                return Ok(Arc::clone(table));
            }
        }
        let table = Arc::new(read_table(path, delimiter, reader)?);
        self.slot = Some((path.to_path_buf(), Arc::clone(&table)));
        Ok(table)
    }

    /// Path of the currently cached table, if any.
    #[cfg(test)]
    pub(crate) fn cached_path(&self) -> Option<&Path> {
        self.slot.as_ref().map(|(path, _)| path.as_path())
    }
}

/// Validates and parses a delimited text file.
pub(crate) fn read_table(path: &Path, delimiter: &str, reader: &TextReader) -> Result<Table, RustyCursorError> {
    if !path.is_file() {
        Err(TableError::SourceNotFoundError(path.display().to_string()))?;
    }
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if extension != SUPPORTED_EXTENSION {
        Err(TableError::UnsupportedFormatError(format!(".{extension}")))?;
    }
    let text = reader.read(path)?;
    let table = parse(&text, delimiter);
    debug!(
        path = %path.display(),
        encoding = reader.encoding_name(),
        rows = table.row_count(),
        "table loaded"
    );
    Ok(table)
}
