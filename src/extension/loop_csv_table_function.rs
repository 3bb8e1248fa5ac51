//! # Loop CSV Table Function
//!
//! Implements the `loop_csv` table function: one call returns one row holding
//! the text the table cursor selects from a delimited file.
use crate::cursor::{Bounds, LoopMode, END_INDEX_MAX};
use crate::extension::{
    session, ColumnParam, ColumnsParam, DelimiterParam, EncodingParam, EndIndexParam,
    ExtensionError, LoopModeParam, NamedParam, OrientationParam, StartIndexParam, StepSizeParam,
};
use crate::looper::{read_texts, LoopRequest};
use crate::session::Session;
use crate::table::parser::DEFAULT_DELIMITER;
use duckdb::{
    core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId},
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};
use rand::Rng;
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Parameters for the loop_csv table function.
#[derive(Debug, Default)]
struct LoopCsvParameters {
    /// Path to the delimited text file
    file_path: String,
    /// Orientation name (default: row)
    orientation: Option<String>,
    /// Single column reference
    column: Option<String>,
    /// Column references; take precedence over `column`
    columns: Option<Vec<String>>,
    /// Loop mode (default: disabled)
    loop_mode: Option<LoopMode>,
    start_index: Option<i64>,
    end_index: Option<i64>,
    step_size: Option<i64>,
    /// Field delimiter (default: ",")
    delimiter: Option<String>,
    /// Encoding label or code page (default: utf-8)
    encoding: Option<String>,
}

impl TryFrom<&BindInfo> for LoopCsvParameters {
    type Error = ExtensionError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(LoopCsvParameters {
            file_path: bind.get_parameter(0).to_string(),
            orientation: OrientationParam::read(bind),
            column: ColumnParam::read(bind),
            columns: ColumnsParam::read(bind),
            loop_mode: LoopModeParam::read(bind),
            start_index: StartIndexParam::read(bind),
            end_index: EndIndexParam::read(bind),
            step_size: StepSizeParam::read(bind),
            delimiter: DelimiterParam::read(bind),
            encoding: EncodingParam::read(bind),
        })
    }
}

impl From<LoopCsvParameters> for LoopRequest {
    fn from(parameters: LoopCsvParameters) -> Self {
        let defaults = LoopRequest::default();
        let references = parameters
            .columns
            .filter(|columns| !columns.is_empty())
            .or_else(|| parameters.column.map(|column| vec![column]))
            .unwrap_or_default();
        LoopRequest {
            file_path: PathBuf::from(parameters.file_path),
            orientation: parameters.orientation.unwrap_or(defaults.orientation),
            references,
            loop_mode: parameters.loop_mode.unwrap_or_default(),
            bounds: Bounds::new(
                parameters.start_index.unwrap_or(0),
                parameters.end_index.unwrap_or(END_INDEX_MAX),
                parameters.step_size.unwrap_or(1),
            ),
            delimiter: parameters
                .delimiter
                .filter(|delimiter| !delimiter.is_empty())
                .unwrap_or_else(|| DEFAULT_DELIMITER.to_string()),
            encoding: parameters.encoding.unwrap_or(defaults.encoding),
        }
    }
}

/// Bind data for the loop_csv table function.
///
/// Binding only fixes the schema; the cursor moves when a query is
/// initialised, so planning (`EXPLAIN`, `PREPARE`) leaves its state alone.
#[repr(C)]
pub(crate) struct LoopCsvBindData {
    session: Arc<Session>,
    request: LoopRequest,
}

impl LoopCsvBindData {
    /// Names of the result columns, one per resolved text.
    fn column_names(&self) -> Vec<String> {
        (1..=self.request.output_width())
            .map(|index| format!("column_{index}_text"))
            .collect()
    }

    /// Moves the cursor and returns the texts of this execution.
    fn resolve<R: Rng>(&self, rng: &mut R) -> Vec<String> {
        read_texts(&self.session, &self.request, rng)
    }
}

/// Initialization data for the loop_csv table function.
#[repr(C)]
pub(crate) struct LoopCsvInitData {
    /// Texts selected for this execution
    texts: Vec<String>,
    /// Whether the single result row was emitted
    done: AtomicBool,
}

pub(crate) struct LoopCsvTableFunction;

impl VTab for LoopCsvTableFunction {
    type InitData = LoopCsvInitData;
    type BindData = LoopCsvBindData;

    /// Registers one VARCHAR column per requested column reference.
    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let session = session(bind)?;
        let request = LoopRequest::from(LoopCsvParameters::try_from(bind)?);
        let data = LoopCsvBindData { session, request };

        for name in data.column_names() {
            bind.add_result_column(&name, LogicalTypeHandle::from(LogicalTypeId::Varchar));
        }
        Ok(data)
    }

    /// Resolves the cursor once per execution.
    /// Cursor failures produce empty texts rather than a query error.
    fn init(init: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        let bind: *const Self::BindData = init.get_bind_data();
        let texts = unsafe { (*bind).resolve(&mut rand::rng()) };
        Ok(LoopCsvInitData {
            texts,
            done: AtomicBool::new(false),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init = func.get_init_data();
        if init.done.swap(true, Ordering::Relaxed) {
            output.set_len(0);
            return Ok(());
        }
        for (index, text) in init.texts.iter().enumerate() {
            output.flat_vector(index).insert(0, text.as_str());
        }
        output.set_len(1);
        Ok(())
    }

    /// Single VARCHAR parameter for the file path
    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![LogicalTypeHandle::from(LogicalTypeId::Varchar)])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![
            OrientationParam::definition(),
            ColumnParam::definition(),
            ColumnsParam::definition(),
            LoopModeParam::definition(),
            StartIndexParam::definition(),
            EndIndexParam::definition(),
            StepSizeParam::definition(),
            DelimiterParam::definition(),
            EncodingParam::definition(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_bind_data_defers_cursor() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("rows.csv");
        fs::write(&path, "r0\nr1\nr2\n").unwrap();
        let config = SessionConfig::with_state_dir(dir.path().to_path_buf());
        let session = Arc::new(Session::new(config));
        let request = LoopRequest::from(LoopCsvParameters {
            file_path: path.display().to_string(),
            loop_mode: Some(LoopMode::Increment),
            ..LoopCsvParameters::default()
        });
        let data = LoopCsvBindData { session, request };

        // Building the schema does not touch the cursor state
        assert_eq!(data.column_names(), vec!["column_1_text"]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        // Every execution takes one step
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(data.resolve(&mut rng), vec!["r0"]);
        assert_eq!(data.resolve(&mut rng), vec!["r1"]);
        assert_eq!(data.column_names(), vec!["column_1_text"]);
    }

    #[test]
    fn test_column_names_follow_references() {
        let dir = tempdir().expect("create temp dir");
        let config = SessionConfig::with_state_dir(dir.path().to_path_buf());
        let session = Arc::new(Session::new(config));
        let request = LoopRequest::from(LoopCsvParameters {
            file_path: dir.path().join("missing.csv").display().to_string(),
            orientation: Some("columns".to_string()),
            columns: Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
            ..LoopCsvParameters::default()
        });
        let data = LoopCsvBindData { session, request };
        assert_eq!(
            data.column_names(),
            vec!["column_1_text", "column_2_text", "column_3_text"]
        );
        assert_eq!(data.resolve(&mut StdRng::seed_from_u64(1)), vec!["", "", ""]);
    }

    #[test]
    fn test_request_defaults() {
        let request = LoopRequest::from(LoopCsvParameters {
            file_path: "data.csv".to_string(),
            ..LoopCsvParameters::default()
        });
        assert_eq!(request.file_path, PathBuf::from("data.csv"));
        assert_eq!(request.orientation, "horizontal_row");
        assert!(request.references.is_empty());
        assert_eq!(request.loop_mode, LoopMode::Disabled);
        assert_eq!(request.bounds, Bounds::default());
        assert_eq!(request.delimiter, ",");
        assert_eq!(request.encoding, "utf-8");
    }

    #[test]
    fn test_request_columns_take_precedence() {
        let request = LoopRequest::from(LoopCsvParameters {
            column: Some("A".to_string()),
            columns: Some(vec!["B".to_string(), "C".to_string()]),
            ..LoopCsvParameters::default()
        });
        assert_eq!(request.references, vec!["B", "C"]);

        let request = LoopRequest::from(LoopCsvParameters {
            column: Some("A".to_string()),
            columns: Some(Vec::new()),
            ..LoopCsvParameters::default()
        });
        assert_eq!(request.references, vec!["A"]);
    }

    #[test]
    fn test_request_clamps_and_falls_back() {
        let request = LoopRequest::from(LoopCsvParameters {
            start_index: Some(-3),
            end_index: Some(10_000_000),
            step_size: Some(0),
            delimiter: Some(String::new()),
            loop_mode: Some(LoopMode::Increment),
            ..LoopCsvParameters::default()
        });
        assert_eq!(request.bounds, Bounds { start: 0, end: END_INDEX_MAX, step: 1 });
        assert_eq!(request.delimiter, ",");
        assert_eq!(request.loop_mode, LoopMode::Increment);
    }
}
