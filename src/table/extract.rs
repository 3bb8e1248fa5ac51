use crate::helpers::string::{join_cells, strip_quotes};
use crate::table::{Table, TableError};

/// Selects what a cursor index addresses within a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Orientation {
    /// The index selects a whole row
    Row,
    /// The index selects a whole column
    Column,
    /// The index selects a row; named columns are read from it individually
    SpecificColumns,
}

impl Orientation {
    /// Canonical name, also used in state file names.
    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Self::Row => "horizontal_row",
            Self::Column => "vertical_column",
            Self::SpecificColumns => "specific_columns",
        }
    }

    /// Parses an orientation name (case-insensitive).
    ///
    /// - Row: "row", "horizontal", "horizontal_row"
    /// - Column: "column", "vertical", "vertical_column"
    /// - SpecificColumns: "columns", "specific_column", "specific_columns"
    pub(crate) fn parse(name: &str) -> Result<Self, TableError> {
        match name.trim().to_ascii_uppercase().as_str() {
            "ROW" | "HORIZONTAL" | "HORIZONTAL_ROW" => Ok(Self::Row),
            "COLUMN" | "VERTICAL" | "VERTICAL_COLUMN" => Ok(Self::Column),
            "COLUMNS" | "SPECIFIC_COLUMN" | "SPECIFIC_COLUMNS" => Ok(Self::SpecificColumns),
            _ => Err(TableError::UnknownOrientationError(name.to_string())),
        }
    }

    /// Number of positions the cursor can walk: columns in column orientation, rows otherwise.
    pub(crate) fn extent(&self, table: &Table) -> usize {
        match self {
            Self::Column => table.column_count(),
            Self::Row | Self::SpecificColumns => table.row_count(),
        }
    }
}

/// Extracts the text addressed by `index`.
///
/// Row and column orientation produce a single text made of the selected
/// cells joined with `delimiter`. Specific-columns orientation produces one
/// text per entry of `columns`, read from the selected row. An index outside
/// the table yields empty texts. Every text is quote-stripped.
pub(crate) fn extract(
    table: &Table,
    orientation: Orientation,
    index: i64,
    delimiter: &str,
    columns: &[usize],
) -> Vec<String> {
    let width = match orientation {
        Orientation::SpecificColumns => columns.len(),
        Orientation::Row | Orientation::Column => 1,
    };
    let position = usize::try_from(index)
        .ok()
        .filter(|position| *position < orientation.extent(table));
    let Some(position) = position else {
        return vec![String::new(); width];
    };

    let texts = match orientation {
        Orientation::Row => {
            let cells = table.row(position).unwrap_or(&[]);
            vec![join_cells(cells.iter().map(|cell| cell.as_str()), delimiter)]
        }
        Orientation::Column => vec![join_cells(table.column(position), delimiter)],
        Orientation::SpecificColumns => columns
            .iter()
            .map(|column| table.cell(position, *column).to_owned())
            .collect(),
    };
    texts
        .iter()
        .map(|text| strip_quotes(text).to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["d".into(), "e".into(), "f".into()],
        ])
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!(Orientation::parse("row").unwrap(), Orientation::Row);
        assert_eq!(Orientation::parse("horizontal_row").unwrap(), Orientation::Row);
        assert_eq!(Orientation::parse("Vertical").unwrap(), Orientation::Column);
        assert_eq!(Orientation::parse("specific_column").unwrap(), Orientation::SpecificColumns);
        assert_eq!(Orientation::parse("specific_columns").unwrap(), Orientation::SpecificColumns);
        assert!(Orientation::parse("diagonal").is_err());
    }

    #[test]
    fn test_extract_row() {
        assert_eq!(extract(&sample(), Orientation::Row, 0, ",", &[]), vec!["a,b,c"]);
        assert_eq!(extract(&sample(), Orientation::Row, 1, " | ", &[]), vec!["d | e | f"]);
    }

    #[test]
    fn test_extract_column() {
        assert_eq!(extract(&sample(), Orientation::Column, 1, ",", &[]), vec!["b,e"]);
    }

    #[test]
    fn test_extract_column_from_ragged_table() {
        let table = Table::new(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["d".into()],
            vec!["g".into(), "h".into(), "i".into()],
        ]);
        assert_eq!(extract(&table, Orientation::Column, 2, ",", &[]), vec!["c,,i"]);
    }

    #[test]
    fn test_extract_specific_columns() {
        assert_eq!(extract(&sample(), Orientation::SpecificColumns, 1, ",", &[1]), vec!["e"]);
        assert_eq!(
            extract(&sample(), Orientation::SpecificColumns, 0, ",", &[2, 0, 9]),
            vec!["c", "a", ""]
        );
    }

    #[test]
    fn test_extract_out_of_range() {
        assert_eq!(extract(&sample(), Orientation::Row, 2, ",", &[]), vec![""]);
        assert_eq!(extract(&sample(), Orientation::Row, -1, ",", &[]), vec![""]);
        assert_eq!(extract(&sample(), Orientation::Column, 3, ",", &[]), vec![""]);
        assert_eq!(
            extract(&sample(), Orientation::SpecificColumns, 7, ",", &[0, 1]),
            vec!["", ""]
        );
        assert_eq!(extract(&Table::default(), Orientation::Row, 0, ",", &[]), vec![""]);
    }

    #[test]
    fn test_extract_strips_quotes() {
        let table = Table::new(vec![vec![" \u{201C}quoted\u{201D} ".into(), "\"x\"".into()]]);
        assert_eq!(
            extract(&table, Orientation::SpecificColumns, 0, ",", &[0, 1]),
            vec!["quoted", "x"]
        );
        // Only the ends of the joined row are stripped
        assert_eq!(extract(&table, Orientation::Row, 0, ",", &[]), vec!["quoted\u{201D} ,\"x"]);
    }
}
