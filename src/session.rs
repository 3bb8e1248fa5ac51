//! Process state shared by every table function of one loaded extension.
use crate::cursor::store::FilePositionStore;
use crate::error::RustyCursorError;
use crate::helpers::reader::TextReader;
use crate::table::cache::TableCache;
use crate::table::Table;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Environment variable overriding the directory of the sequence state file.
pub(crate) const STATE_DIR_VARIABLE: &str = "RUSTY_CURSOR_STATE_DIR";

/// File name of the single sequence cursor position record.
pub(crate) const SEQUENCE_STATE_FILE_NAME: &str = "rusty_cursor_sequence_state.txt";

/// DuckDB's per-user directory, relative to the home directory.
pub(crate) const DUCKDB_HOME_DIR: &str = ".duckdb";

#[derive(Clone, Debug)]
pub(crate) struct SessionConfig {
    /// Where the image sequence cursor keeps its position
    pub(crate) sequence_state_file: PathBuf,
}

impl SessionConfig {
    /// Builds the configuration from the environment.
    pub(crate) fn from_env() -> Self {
        let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
        Self::from_vars(std::env::var_os(STATE_DIR_VARIABLE), home)
    }

    /// Places the sequence state file in the first writable directory of:
    /// the override directory, `<home>/.duckdb`, the system temp directory.
    /// Missing directories are created.
    pub(crate) fn from_vars(override_dir: Option<OsString>, home: Option<OsString>) -> Self {
        let candidates = [
            override_dir.filter(|dir| !dir.is_empty()).map(PathBuf::from),
            home.filter(|dir| !dir.is_empty())
                .map(|home| PathBuf::from(home).join(DUCKDB_HOME_DIR)),
        ];
        let dir = candidates
            .into_iter()
            .flatten()
            .find(|dir| match ensure_writable(dir) {
                Ok(()) => true,
                Err(error) => {
                    warn!(dir = %dir.display(), %error, "state directory not writable, trying next");
                    false
                }
            })
            .unwrap_or_else(std::env::temp_dir);
        Self::with_state_dir(dir)
    }

    pub(crate) fn with_state_dir(dir: PathBuf) -> Self {
        SessionConfig {
            sequence_state_file: dir.join(SEQUENCE_STATE_FILE_NAME),
        }
    }
}

/// Creates `dir` if needed and checks that a file can be written into it.
fn ensure_writable(dir: &Path) -> Result<(), RustyCursorError> {
    fs::create_dir_all(dir)?;
    let check_file = dir.join(format!(".{SEQUENCE_STATE_FILE_NAME}.check"));
    fs::write(&check_file, b"")?;
    fs::remove_file(&check_file)?;
    Ok(())
}

/// Owns the table cache and the position store for the lifetime of the host connection.
pub(crate) struct Session {
    config: SessionConfig,
    tables: Mutex<TableCache>,
    store: FilePositionStore,
}

impl Session {
    pub(crate) fn new(config: SessionConfig) -> Self {
        Session {
            config,
            tables: Mutex::new(TableCache::new()),
            store: FilePositionStore,
        }
    }

    /// Loads a table through the session cache.
    pub(crate) fn load_table(&self, path: &Path, delimiter: &str, encoding: &str) -> Result<Arc<Table>, RustyCursorError> {
        let reader = TextReader::new(encoding)?;
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.load(path, delimiter, &reader)
    }

    pub(crate) fn store(&self) -> &FilePositionStore {
        &self.store
    }

    pub(crate) fn sequence_state_file(&self) -> &Path {
        &self.config.sequence_state_file
    }
}
