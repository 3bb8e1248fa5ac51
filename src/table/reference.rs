use regex::Regex;
use thiserror::Error;

/// Errors related to spreadsheet-style column labels.
#[derive(Error, Debug)]
pub(crate) enum ReferenceError {
    #[error("Invalid column name '{0}', please use letters like A, B, C")]
    InvalidColumnLabelError(String),
}

/// Converts a spreadsheet column label to a 0-based column index.
///
/// Letters are base-26 digits with A = 1 .. Z = 26, so "A" is 0, "Z" is 25,
/// "AA" is 26 and "ZZ" is 701. Labels are case-insensitive; anything other
/// than one or more letters A-Z is rejected.
pub(crate) fn col_to_index(label: &str) -> Result<usize, ReferenceError> {
    let pattern = Regex::new(r"^[A-Z]+$").expect("Hardcode regex pattern");
    let letters = label.to_ascii_uppercase();
    let invalid = || ReferenceError::InvalidColumnLabelError(label.to_owned());
    if !pattern.is_match(&letters) {
        return Err(invalid());
    }
    letters
        .bytes()
        .map(|letter| (letter - b'A' + 1) as usize)
        .try_fold(0usize, |index, digit| index.checked_mul(26)?.checked_add(digit))
        .map(|column| column - 1)
        .ok_or_else(invalid)
}

/// Converts a 0-based column index back to its spreadsheet label.
pub(crate) fn index_to_col(index: usize) -> String {
    let mut column = index + 1;
    let mut label = String::new();
    while column > 0 {
        column -= 1;
        label.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letters() {
        for (offset, letter) in ('A'..='Z').enumerate() {
            assert_eq!(col_to_index(&letter.to_string()).unwrap(), offset);
        }
    }

    #[test]
    fn test_multiple_letters() {
        assert_eq!(col_to_index("AA").unwrap(), 26);
        assert_eq!(col_to_index("AZ").unwrap(), 51);
        assert_eq!(col_to_index("BA").unwrap(), 52);
        assert_eq!(col_to_index("ZZ").unwrap(), 26 * 26 + 26 - 1);
        assert_eq!(col_to_index("AAA").unwrap(), 702);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(col_to_index("b").unwrap(), 1);
        assert_eq!(col_to_index("aB").unwrap(), 27);
    }

    #[test]
    fn test_invalid_labels() {
        for label in ["", "1", "A1", " A", "A-B", "\u{c4}", "B "] {
            assert!(
                matches!(col_to_index(label), Err(ReferenceError::InvalidColumnLabelError(_))),
                "'{label}' should be rejected"
            );
        }
    }

    #[test]
    fn test_overflowing_label() {
        assert!(col_to_index(&"Z".repeat(64)).is_err());
    }

    #[test]
    fn test_index_to_col() {
        for index in [0, 1, 25, 26, 51, 52, 701, 702, 16383] {
            assert_eq!(col_to_index(&index_to_col(index)).unwrap(), index);
        }
        assert_eq!(index_to_col(701), "ZZ");
    }
}
