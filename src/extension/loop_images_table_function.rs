//! # Loop Images Table Function
//!
//! Implements the `loop_images` table function: one call moves the session's
//! sequence cursor over a directory of images and returns the selected image.
use crate::extension::{
    session, ExtensionError, ModeParam, NamedParam, PositionParam, ShowTextParam,
};
use crate::sequence::{select_image_or_sentinel, ImageSelection, SequenceMode, SequenceRequest};
use crate::session::Session;
use duckdb::{
    core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId},
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};
use rand::Rng;
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result columns, in output order.
const COLUMNS: [&str; 4] = ["image_path", "prompt_text", "file_name", "image_count"];

/// Parameters for the loop_images table function.
#[derive(Debug, Default)]
struct LoopImagesParameters {
    /// Directory holding the images
    directory: String,
    /// Sequence mode (default: increment)
    mode: Option<SequenceMode>,
    /// 1-based position for position mode (default: 1)
    position: Option<i64>,
    /// Whether to read the sidecar text (default: true)
    show_text: Option<bool>,
}

impl TryFrom<&BindInfo> for LoopImagesParameters {
    type Error = ExtensionError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(LoopImagesParameters {
            directory: bind.get_parameter(0).to_string(),
            mode: ModeParam::read(bind),
            position: PositionParam::read(bind),
            show_text: ShowTextParam::read(bind),
        })
    }
}

impl From<LoopImagesParameters> for SequenceRequest {
    fn from(parameters: LoopImagesParameters) -> Self {
        let defaults = SequenceRequest::default();
        SequenceRequest {
            directory: PathBuf::from(parameters.directory),
            mode: parameters.mode.unwrap_or(defaults.mode),
            position: parameters.position.unwrap_or(defaults.position),
            show_text: parameters.show_text.unwrap_or(defaults.show_text),
        }
    }
}

/// Bind data for the loop_images table function.
///
/// Binding only fixes the schema; the cursor moves when a query is
/// initialised, so planning (`EXPLAIN`, `PREPARE`) leaves its state alone.
#[repr(C)]
pub(crate) struct LoopImagesBindData {
    session: Arc<Session>,
    request: SequenceRequest,
}

impl LoopImagesBindData {
    /// Moves the cursor and returns the selection of this execution.
    fn resolve<R: Rng>(&self, rng: &mut R) -> ImageSelection {
        select_image_or_sentinel(&self.session, &self.request, rng)
    }
}

/// Initialization data for the loop_images table function.
#[repr(C)]
pub(crate) struct LoopImagesInitData {
    /// Image selected for this execution
    selection: ImageSelection,
    /// Whether the single result row was emitted
    done: AtomicBool,
}

impl LoopImagesInitData {
    /// Values in the order of [`COLUMNS`].
    fn values(&self) -> [&str; 4] {
        [
            self.selection.image_path.as_str(),
            self.selection.prompt_text.as_str(),
            self.selection.file_name.as_str(),
            self.selection.image_count.as_str(),
        ]
    }
}

pub(crate) struct LoopImagesTableFunction;

impl VTab for LoopImagesTableFunction {
    type InitData = LoopImagesInitData;
    type BindData = LoopImagesBindData;

    /// Registers the four VARCHAR result columns.
    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let session = session(bind)?;
        let request = SequenceRequest::from(LoopImagesParameters::try_from(bind)?);

        for name in COLUMNS {
            bind.add_result_column(name, LogicalTypeHandle::from(LogicalTypeId::Varchar));
        }
        Ok(LoopImagesBindData { session, request })
    }

    /// Moves the sequence cursor once per execution.
    /// Failures produce a sentinel row rather than a query error.
    fn init(init: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        let bind: *const Self::BindData = init.get_bind_data();
        let selection = unsafe { (*bind).resolve(&mut rand::rng()) };
        Ok(LoopImagesInitData {
            selection,
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
        for (index, value) in init.values().into_iter().enumerate() {
            output.flat_vector(index).insert(0, value);
        }
        output.set_len(1);
        Ok(())
    }

    /// Single VARCHAR parameter for the image directory
    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![LogicalTypeHandle::from(LogicalTypeId::Varchar)])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![
            ModeParam::definition(),
            PositionParam::definition(),
            ShowTextParam::definition(),
        ])
    }
}
