//! Parser for uniformly delimited text.
//!
//! Records end at `\n`, `\r\n` or a lone `\r`. A field that starts with a
//! double quote is quoted: delimiters and line breaks inside it are literal
//! and `""` stands for one quote. Text following the closing quote is kept.
//! A quote in the middle of an unquoted field is an ordinary character.
//! Blank lines produce rows without cells.
use crate::table::Table;
use std::mem::take;

/// Delimiter used when the configured one is empty.
pub(crate) const DEFAULT_DELIMITER: &str = ",";

const QUOTE: char = '"';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Nothing consumed for the current field yet
    FieldStart,
    /// Inside an unquoted field
    Unquoted,
    /// Inside a quoted field
    Quoted,
    /// Just saw a quote inside a quoted field (closing or first half of `""`)
    QuoteInQuoted,
}

/// Incremental record builder shared by the parse loop.
struct Records {
    rows: Vec<Vec<String>>,
    record: Vec<String>,
    field: String,
    /// Whether the current line has produced anything, including a bare delimiter
    pending: bool,
}

impl Records {
    fn end_field(&mut self) {
        self.record.push(take(&mut self.field));
        self.pending = true;
    }

    fn end_record(&mut self) {
        if self.pending {
            self.record.push(take(&mut self.field));
        }
        self.rows.push(take(&mut self.record));
        self.pending = false;
    }
}

/// Parses `text` into a table, splitting fields on `delimiter`.
pub(crate) fn parse(text: &str, delimiter: &str) -> Table {
    let delimiter = if delimiter.is_empty() {
        DEFAULT_DELIMITER
    } else {
        delimiter
    };
    let mut records = Records {
        rows: Vec::new(),
        record: Vec::new(),
        field: String::new(),
        pending: false,
    };
    let mut state = State::FieldStart;
    let mut position = 0;

    while position < text.len() {
        let rest = &text[position..];
        if state != State::Quoted && rest.starts_with(delimiter) {
            records.end_field();
            state = State::FieldStart;
            position += delimiter.len();
            continue;
        }
        let Some(char) = rest.chars().next() else {
            break;
        };
        position += char.len_utf8();

        match (state, char) {
            (State::Quoted, QUOTE) => state = State::QuoteInQuoted,
            (State::Quoted, char) => records.field.push(char),
            (State::QuoteInQuoted, QUOTE) => {
                records.field.push(QUOTE);
                state = State::Quoted;
            }
            (_, '\r') if text[position..].starts_with('\n') => {}
            (_, '\n') | (_, '\r') => {
                records.end_record();
                state = State::FieldStart;
            }
            (State::FieldStart, QUOTE) => {
                state = State::Quoted;
                records.pending = true;
            }
            (_, char) => {
                records.field.push(char);
                records.pending = true;
                state = State::Unquoted;
            }
        }
    }

    // Unterminated last line, including an unclosed quoted field
    if records.pending {
        records.end_record();
    }
    Table::new(records.rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str, delimiter: &str) -> Vec<Vec<String>> {
        let table = parse(text, delimiter);
        (0..table.row_count())
            .map(|row| table.row(row).unwrap_or(&[]).to_vec())
            .collect()
    }

    fn expect(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(rows("a,b,c\nd,e,f\n", ","), expect(&[&["a", "b", "c"], &["d", "e", "f"]]));
        assert_eq!(rows("a,b,c\nd,e,f", ","), expect(&[&["a", "b", "c"], &["d", "e", "f"]]));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(rows("", ",").is_empty());
    }

    #[test]
    fn test_parse_crlf() {
        assert_eq!(rows("a,b\r\nc,d\r\n", ","), expect(&[&["a", "b"], &["c", "d"]]));
        assert_eq!(rows("a\rb", ","), expect(&[&["a"], &["b"]]));
    }

    #[test]
    fn test_parse_blank_line_is_empty_row() {
        assert_eq!(rows("a\n\nb\n", ","), expect(&[&["a"], &[], &["b"]]));
    }

    #[test]
    fn test_parse_empty_fields() {
        assert_eq!(rows("a,,\n,\n", ","), expect(&[&["a", "", ""], &["", ""]]));
        assert_eq!(rows("\"\"\n", ","), expect(&[&[""]]));
    }

    #[test]
    fn test_parse_quoted_fields() {
        assert_eq!(
            rows("\"a,b\",\"say \"\"hi\"\"\"\n", ","),
            expect(&[&["a,b", "say \"hi\""]])
        );
        assert_eq!(rows("\"line\nbreak\",x\n", ","), expect(&[&["line\nbreak", "x"]]));
        assert_eq!(rows("\"ab\"cd,e", ","), expect(&[&["abcd", "e"]]));
        assert_eq!(rows("ab\"cd\",e", ","), expect(&[&["ab\"cd\"", "e"]]));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        assert_eq!(rows("\"abc", ","), expect(&[&["abc"]]));
    }

    #[test]
    fn test_parse_multi_character_delimiter() {
        assert_eq!(rows("a||b||c\n\"x||y\"||z", "||"), expect(&[&["a", "b", "c"], &["x||y", "z"]]));
        assert_eq!(rows("a|b||c", "||"), expect(&[&["a|b", "c"]]));
    }

    #[test]
    fn test_parse_other_delimiters() {
        assert_eq!(rows("a;b\tc", ";"), expect(&[&["a", "b\tc"]]));
        assert_eq!(rows("a\tb", "\t"), expect(&[&["a", "b"]]));
        assert_eq!(rows("a,b", ""), expect(&[&["a", "b"]]));
    }

    #[test]
    fn test_parse_unicode() {
        assert_eq!(rows("\u{201C}q\u{201D},\u{e9}t\u{e9}", ","), expect(&[&["\u{201C}q\u{201D}", "\u{e9}t\u{e9}"]]));
    }
}
