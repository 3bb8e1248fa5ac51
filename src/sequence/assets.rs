use crate::error::{ResultMessage, RustyCursorError};
use crate::sequence::SequenceError;
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// File patterns recognised as images.
pub(crate) const IMAGE_PATTERNS: [&str; 4] = ["*.png", "*.jpg", "*.jpeg", "*.webp"];

/// Prompt text reported when an image has no sidecar text file.
pub(crate) const MISSING_PROMPT_TEXT: &str = "No text file found";

/// An image picked from the sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Asset {
    pub(crate) path: PathBuf,
    /// File name without extension
    pub(crate) stem: String,
}

impl Asset {
    pub(crate) fn new(path: PathBuf) -> Self {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Asset { path, stem }
    }
}

/// Lists the images directly inside `directory`, sorted by path.
/// Hidden files are skipped and extensions are matched case-sensitively.
pub(crate) fn discover(directory: &Path) -> Result<Vec<PathBuf>, RustyCursorError> {
    if !directory.is_dir() {
        Err(SequenceError::DirectoryNotFoundError(directory.display().to_string()))?;
    }
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let prefix = Pattern::escape(&directory.to_string_lossy());
    let mut files = Vec::new();
    for pattern in IMAGE_PATTERNS {
        let pattern = Path::new(&prefix).join(pattern);
        for entry in glob_with(&pattern.to_string_lossy(), options)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Reads the trimmed `<stem>.txt` sidecar from `directory`.
/// Returns a placeholder when the sidecar does not exist; invalid UTF-8 is replaced.
pub(crate) fn read_prompt(directory: &Path, stem: &str) -> Result<String, RustyCursorError> {
    let text_path = directory.join(format!("{stem}.txt"));
    if !text_path.exists() {
        return Ok(MISSING_PROMPT_TEXT.to_string());
    }
    let bytes = std::fs::read(&text_path)
        .map_err(RustyCursorError::from)
        .with_prefix(&text_path.display().to_string())?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}
