//! # Extension Core Module
//!
//! Named parameter handling shared by the cursor table functions, and access
//! to the session the functions were registered with.
use crate::bridge::ValueBridge;
use crate::cursor::LoopMode;
use crate::sequence::SequenceMode;
use crate::session::Session;
use duckdb::core::{LogicalTypeHandle, LogicalTypeId};
use duckdb::vtab::BindInfo;
use std::sync::Arc;
use thiserror::Error;

pub(crate) mod loop_csv_table_function;
pub(crate) mod loop_images_table_function;

/// Errors raised by the table function plumbing itself.
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// The table function was registered without its session
    #[error("Table function has no session attached")]
    MissingSessionError,
}

/// Returns the session the table function was registered with.
pub(crate) fn session(bind: &BindInfo) -> Result<Arc<Session>, ExtensionError> {
    let session = bind.get_extra_info::<Arc<Session>>();
    if session.is_null() {
        return Err(ExtensionError::MissingSessionError);
    }
    Ok(Arc::clone(unsafe { &*session }))
}

// Named parameter handling traits and implementations

/// Trait for handling named parameters in DuckDB table functions.
///
/// # Type Parameters
///
/// * `T` - The type of the parameter value
pub trait NamedParam<T> {
    /// Returns the parameter name as used in SQL
    fn name() -> &'static str;

    /// Returns the DuckDB logical type for this parameter
    fn kind() -> LogicalTypeHandle;

    /// Returns the complete parameter definition (name and type)
    fn definition() -> (String, LogicalTypeHandle) {
        (Self::name().to_string(), Self::kind())
    }

    /// Extracts the parameter value, None if it was not provided
    fn read(bind: &BindInfo) -> Option<T>;
}

/// Orientation parameter handler
pub(crate) struct OrientationParam;

/// Single column reference parameter handler
pub(crate) struct ColumnParam;

/// Column reference list parameter handler
pub(crate) struct ColumnsParam;

/// Table cursor loop mode parameter handler
pub(crate) struct LoopModeParam;

/// Start index parameter handler
pub(crate) struct StartIndexParam;

/// End index parameter handler
pub(crate) struct EndIndexParam;

/// Step size parameter handler
pub(crate) struct StepSizeParam;

/// Field delimiter parameter handler
pub(crate) struct DelimiterParam;

/// Text encoding parameter handler
pub(crate) struct EncodingParam;

/// Image sequence mode parameter handler
pub(crate) struct ModeParam;

/// Image position parameter handler
pub(crate) struct PositionParam;

/// Show text parameter handler
pub(crate) struct ShowTextParam;

fn varchar() -> LogicalTypeHandle {
    LogicalTypeHandle::from(LogicalTypeId::Varchar)
}

fn bigint() -> LogicalTypeHandle {
    LogicalTypeHandle::from(LogicalTypeId::Bigint)
}

impl NamedParam<String> for OrientationParam {
    fn name() -> &'static str {
        "orientation"
    }

    fn kind() -> LogicalTypeHandle {
        varchar()
    }

    fn read(bind: &BindInfo) -> Option<String> {
        Some(bind.get_named_parameter(Self::name())?.to_varchar())
    }
}

impl NamedParam<String> for ColumnParam {
    fn name() -> &'static str {
        "column"
    }

    fn kind() -> LogicalTypeHandle {
        varchar()
    }

    fn read(bind: &BindInfo) -> Option<String> {
        Some(bind.get_named_parameter(Self::name())?.to_varchar())
    }
}

impl NamedParam<Vec<String>> for ColumnsParam {
    fn name() -> &'static str {
        "columns"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::list(&varchar())
    }

    fn read(bind: &BindInfo) -> Option<Vec<String>> {
        Some(
            ValueBridge::to_list(&bind.get_named_parameter(Self::name())?)
                .iter()
                .map(|value| value.to_varchar())
                .collect(),
        )
    }
}

impl NamedParam<LoopMode> for LoopModeParam {
    fn name() -> &'static str {
        "loop_mode"
    }

    fn kind() -> LogicalTypeHandle {
        varchar()
    }

    fn read(bind: &BindInfo) -> Option<LoopMode> {
        let parameter = bind.get_named_parameter(Self::name())?.to_varchar();
        Some(LoopMode::parse(&parameter))
    }
}

impl NamedParam<i64> for StartIndexParam {
    fn name() -> &'static str {
        "start_index"
    }

    fn kind() -> LogicalTypeHandle {
        bigint()
    }

    fn read(bind: &BindInfo) -> Option<i64> {
        Some(bind.get_named_parameter(Self::name())?.to_int64())
    }
}

impl NamedParam<i64> for EndIndexParam {
    fn name() -> &'static str {
        "end_index"
    }

    fn kind() -> LogicalTypeHandle {
        bigint()
    }

    fn read(bind: &BindInfo) -> Option<i64> {
        Some(bind.get_named_parameter(Self::name())?.to_int64())
    }
}

impl NamedParam<i64> for StepSizeParam {
    fn name() -> &'static str {
        "step_size"
    }

    fn kind() -> LogicalTypeHandle {
        bigint()
    }

    fn read(bind: &BindInfo) -> Option<i64> {
        Some(bind.get_named_parameter(Self::name())?.to_int64())
    }
}

impl NamedParam<String> for DelimiterParam {
    fn name() -> &'static str {
        "delimiter"
    }

    fn kind() -> LogicalTypeHandle {
        varchar()
    }

    fn read(bind: &BindInfo) -> Option<String> {
        Some(bind.get_named_parameter(Self::name())?.to_varchar())
    }
}

impl NamedParam<String> for EncodingParam {
    fn name() -> &'static str {
        "encoding"
    }

    fn kind() -> LogicalTypeHandle {
        varchar()
    }

    fn read(bind: &BindInfo) -> Option<String> {
        Some(bind.get_named_parameter(Self::name())?.to_varchar())
    }
}

impl NamedParam<SequenceMode> for ModeParam {
    fn name() -> &'static str {
        "mode"
    }

    fn kind() -> LogicalTypeHandle {
        varchar()
    }

    fn read(bind: &BindInfo) -> Option<SequenceMode> {
        let parameter = bind.get_named_parameter(Self::name())?.to_varchar();
        Some(SequenceMode::parse(&parameter))
    }
}

impl NamedParam<i64> for PositionParam {
    fn name() -> &'static str {
        "position"
    }

    fn kind() -> LogicalTypeHandle {
        bigint()
    }

    fn read(bind: &BindInfo) -> Option<i64> {
        Some(bind.get_named_parameter(Self::name())?.to_int64())
    }
}

impl NamedParam<bool> for ShowTextParam {
    fn name() -> &'static str {
        "show_text"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Boolean)
    }

    fn read(bind: &BindInfo) -> Option<bool> {
        Some(bind.get_named_parameter(Self::name())?.to_bool())
    }
}
