//! # Table Looper
//!
//! Resolves one call of the delimited-table cursor: load the table, fit the
//! bounds to it, pick an index with the configuration's cursor and read the
//! addressed text. The boundary never fails; see [`read_texts`].
use crate::cursor::fingerprint::Fingerprint;
use crate::cursor::{Bounds, IndexCursor, LoopMode};
use crate::error::RustyCursorError;
use crate::session::Session;
use crate::table::extract::{extract, Orientation};
use crate::table::parser::DEFAULT_DELIMITER;
use crate::table::reference::{col_to_index, index_to_col};
use crate::table::TableError;
use rand::Rng;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Largest number of column references a single call reads.
pub(crate) const MAX_COLUMN_REFERENCES: usize = 5;

/// Options of one table cursor call.
#[derive(Clone, Debug)]
pub(crate) struct LoopRequest {
    pub(crate) file_path: PathBuf,
    /// Orientation name as given by the caller
    pub(crate) orientation: String,
    /// Column labels, used in specific-columns orientation
    pub(crate) references: Vec<String>,
    pub(crate) loop_mode: LoopMode,
    pub(crate) bounds: Bounds,
    pub(crate) delimiter: String,
    pub(crate) encoding: String,
}

impl LoopRequest {
    /// Number of texts produced: one per column reference, at least one.
    pub(crate) fn output_width(&self) -> usize {
        self.references.len().clamp(1, MAX_COLUMN_REFERENCES)
    }
}

impl Default for LoopRequest {
    fn default() -> Self {
        LoopRequest {
            file_path: PathBuf::new(),
            orientation: Orientation::Row.as_str().to_string(),
            references: Vec::new(),
            loop_mode: LoopMode::default(),
            bounds: Bounds::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            encoding: "utf-8".to_string(),
        }
    }
}

/// Resolves the request, returning exactly `request.output_width()` texts.
/// Any failure is logged and turned into empty texts.
pub(crate) fn read_texts<R: Rng>(session: &Session, request: &LoopRequest, rng: &mut R) -> Vec<String> {
    let width = request.output_width();
    match resolve_texts(session, request, rng) {
        Ok(mut texts) => {
            texts.resize(width, String::new());
            texts
        }
        Err(error) => {
            report(&error, request);
            vec![String::new(); width]
        }
    }
}

/// Resolves the request. Row and column orientation yield one text,
/// specific-columns orientation one text per column reference.
pub(crate) fn resolve_texts<R: Rng>(
    session: &Session,
    request: &LoopRequest,
    rng: &mut R,
) -> Result<Vec<String>, RustyCursorError> {
    let orientation = Orientation::parse(&request.orientation)?;
    let table = session.load_table(&request.file_path, &request.delimiter, &request.encoding)?;

    if request.references.len() > MAX_COLUMN_REFERENCES {
        warn!(
            given = request.references.len(),
            used = MAX_COLUMN_REFERENCES,
            "too many column references, extra ones are ignored"
        );
    }
    let references = &request.references[..request.references.len().min(MAX_COLUMN_REFERENCES)];
    let columns = match orientation {
        Orientation::SpecificColumns if references.is_empty() => Err(TableError::MissingColumnReferenceError)?,
        Orientation::SpecificColumns => references
            .iter()
            .map(|reference| col_to_index(reference))
            .collect::<Result<Vec<_>, _>>()?,
        Orientation::Row | Orientation::Column => Vec::new(),
    };

    let bounds = request.bounds.normalize(orientation.extent(&table));
    let fingerprint = Fingerprint::new(&request.file_path, orientation, references, &request.loop_mode, bounds);
    let cursor = IndexCursor::new(request.loop_mode.clone(), bounds);
    let index = cursor.resolve(&fingerprint, session.store(), rng)?;

    debug!(
        mode = request.loop_mode.as_str(),
        orientation = orientation.as_str(),
        index,
        column = orientation_label(orientation, index).as_deref().unwrap_or(""),
        references = ?references,
        "cursor resolved"
    );
    let texts = extract(&table, orientation, index, &request.delimiter, &columns);
    debug!(texts = ?texts, "extracted");
    Ok(texts)
}

/// Spreadsheet label of the chosen column in column orientation.
fn orientation_label(orientation: Orientation, index: i64) -> Option<String> {
    match orientation {
        Orientation::Column => usize::try_from(index).ok().map(index_to_col),
        Orientation::Row | Orientation::SpecificColumns => None,
    }
}

fn report(error: &RustyCursorError, request: &LoopRequest) {
    let file_path = request.file_path.display();
    match error {
        RustyCursorError::ReferenceError(error) => {
            warn!(%error, references = ?request.references, "invalid column reference")
        }
        RustyCursorError::TableError(
            error @ (TableError::SourceNotFoundError(_) | TableError::UnsupportedFormatError(_)),
        ) => warn!(%error, %file_path, "cannot open table source"),
        error => warn!(%error, %file_path, "table cursor failed"),
    }
}
