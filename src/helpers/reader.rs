use crate::error::RustyCursorError;
use encoding_rs::Encoding;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum TextReaderError {
    #[error("Unknown text encoding '{0}'")]
    UnknownEncodingError(String),
}

/// Reads whole text files from disk and decodes them into UTF-8.
///
/// The configured encoding is only a default: a byte order mark at the start
/// of the file always wins. Malformed byte sequences are replaced with
/// U+FFFD instead of failing the read.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TextReader {
    encoding: &'static Encoding,
}

impl TextReader {
    /// Creates a reader for an encoding label ("utf-8", "gbk", "windows-1252")
    /// or a Windows code page number ("936", "1252").
    /// An empty label selects UTF-8.
    pub(crate) fn new(label: &str) -> Result<TextReader, RustyCursorError> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(TextReader::default());
        }
        let encoding = match label.parse::<u16>() {
            Ok(code_page) => codepage::to_encoding(code_page),
            Err(_) => Encoding::for_label(label.as_bytes()),
        };
        let encoding = encoding.ok_or_else(|| TextReaderError::UnknownEncodingError(label.to_owned()))?;
        Ok(TextReader { encoding })
    }

    /// Returns the canonical name of the configured encoding.
    pub(crate) fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes raw bytes, sniffing a BOM before falling back to the configured encoding.
    pub(crate) fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.encoding.decode(bytes);
        text.into_owned()
    }

    /// Reads and decodes the whole file at `path`.
    pub(crate) fn read(&self, path: &Path) -> Result<String, RustyCursorError> {
        let bytes = std::fs::read(path)?;
        Ok(self.decode(&bytes))
    }
}

impl Default for TextReader {
    fn default() -> Self {
        TextReader {
            encoding: encoding_rs::UTF_8,
        }
    }
}
