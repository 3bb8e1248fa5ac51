//! Shared helpers for decoding source files and normalising extracted text.
pub(crate) mod reader;
pub(crate) mod string;
