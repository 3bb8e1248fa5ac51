//! Text normalisation applied to every value handed back to the host.

/// Characters removed from both ends of extracted text:
/// space, ASCII double quote and the two curly double quotes.
const QUOTE_CHARS: [char; 4] = [' ', '"', '\u{201C}', '\u{201D}'];

/// Strips spaces and straight/curly double quotes from both ends of `text`.
#[inline]
pub(crate) fn strip_quotes(text: &str) -> &str {
    text.trim_matches(&QUOTE_CHARS[..])
}

/// Joins cells with the configured delimiter.
pub(crate) fn join_cells<'a, I>(cells: I, delimiter: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    cells.into_iter().collect::<Vec<_>>().join(delimiter)
}
