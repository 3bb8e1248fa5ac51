use thiserror::Error;

/// Main error type for the Rusty Cursor extension.
/// Aggregates errors from the standard library, dependencies and internal modules.
#[derive(Error, Debug)]
pub(crate) enum RustyCursorError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    GlobError(#[from] glob::GlobError),

    // Helper module errors
    #[error("{0}")]
    TextReaderError(#[from] crate::helpers::reader::TextReaderError),

    // Table module errors
    #[error("{0}")]
    TableError(#[from] crate::table::TableError),

    #[error("{0}")]
    ReferenceError(#[from] crate::table::reference::ReferenceError),

    // Sequence module errors
    #[error("{0}")]
    SequenceError(#[from] crate::sequence::SequenceError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RustyCursorError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RustyCursorError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableError;

    #[test]
    fn test_with_prefix_keeps_message() {
        let result: Result<(), RustyCursorError> =
            Err(TableError::SourceNotFoundError("a.csv".to_string()).into());
        let error = result.with_prefix("loading").unwrap_err();
        assert!(matches!(error, RustyCursorError::WithContextError(_)));
        assert!(error.to_string().starts_with("loading: "));
        assert!(error.to_string().contains("a.csv"));

        let ok: Result<i32, RustyCursorError> = Ok(3);
        assert_eq!(ok.with_prefix("unused").unwrap(), 3);
    }
}
