use crate::error::RustyCursorError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors raised by position records. Corruption is recovered by `read`.
#[derive(Error, Debug)]
pub(crate) enum StoreError {
    #[error("Corrupt cursor state in '{0}': '{1}'")]
    CorruptStateError(String, String),
}

/// Key to integer store holding cursor positions, one record per state file.
pub(crate) trait PositionStore {
    /// Returns the stored position, or `fallback` when the record is missing or unreadable.
    fn read(&self, state_file: &Path, fallback: i64) -> i64;

    /// Replaces the stored position.
    fn write(&self, state_file: &Path, value: i64) -> Result<(), RustyCursorError>;
}

/// Position store keeping each record in its own small text file holding a
/// decimal integer. There is no locking: concurrent writers race and the
/// last write wins.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FilePositionStore;

impl FilePositionStore {
    /// Parses the content of a state file.
    pub(crate) fn parse(state_file: &Path, content: &str) -> Result<i64, StoreError> {
        content.trim().parse::<i64>().map_err(|_| {
            StoreError::CorruptStateError(state_file.display().to_string(), content.to_owned())
        })
    }

    /// Sibling file the new content is staged in before it replaces the record.
    fn staging_file(state_file: &Path) -> PathBuf {
        let mut name = state_file.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        state_file.with_file_name(name)
    }
}

impl PositionStore for FilePositionStore {
    fn read(&self, state_file: &Path, fallback: i64) -> i64 {
        let content = match fs::read_to_string(state_file) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return fallback,
            Err(error) => {
                warn!(state_file = %state_file.display(), %error, "cannot read cursor state, using fallback");
                return fallback;
            }
        };
        Self::parse(state_file, &content).unwrap_or_else(|error| {
            warn!(%error, fallback, "cursor state repaired");
            fallback
        })
    }

    fn write(&self, state_file: &Path, value: i64) -> Result<(), RustyCursorError> {
        let staging_file = Self::staging_file(state_file);
        fs::write(&staging_file, value.to_string())?;
        fs::rename(&staging_file, state_file)?;
        Ok(())
    }
}
