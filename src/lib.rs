//! # DuckDB Cursor Extension
//!
//! A DuckDB extension that walks datasets one call at a time: each query picks
//! the next entry of a delimited text table or of an image directory, and the
//! position survives between queries and process restarts.
//!
//! ## Features
//!
//! - **Table cursor**: select a row, a column, or up to five named columns of a
//!   `.csv` file
//! - **Loop modes**: fixed, random within bounds, or incrementing with a
//!   position persisted next to the source file
//! - **Flexible input**: custom (multi-character) delimiters, any WHATWG
//!   encoding label or Windows code page, byte-order-mark detection
//! - **Image sequence cursor**: step forward, backward, randomly or to a fixed
//!   position through the images of a directory, with sidecar prompt text
//! - **Never fails a query**: bad input yields empty texts or a sentinel row
//!
//! ## Table Functions
//!
//! This extension registers two table functions:
//!
//! - `loop_csv`: Return the text the table cursor selects from a delimited file
//! - `loop_images`: Return the image the sequence cursor selects from a directory
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

mod bridge;
mod cursor;
mod error;
mod extension;
mod helpers;
mod looper;
mod sequence;
mod session;
mod table;

use crate::extension::loop_csv_table_function::LoopCsvTableFunction;
use crate::extension::loop_images_table_function::LoopImagesTableFunction;
use crate::session::{Session, SessionConfig};
use anyhow::{Context, Result};
use duckdb::Connection;
use duckdb_loadable_macros::duckdb_entrypoint_c_api;
use libduckdb_sys as ffi;
use std::sync::Arc;

/// Extension entry point for DuckDB.
///
/// Creates the session shared by both table functions and registers:
///
/// - `loop_csv`: Table cursor over a delimited text file
/// - `loop_images`: Sequence cursor over an image directory
///
/// # Errors
///
/// Returns an error if either table function fails to register with DuckDB.
#[duckdb_entrypoint_c_api()]
pub unsafe fn extension_entrypoint(connection: Connection) -> Result<()> {
    let session = Arc::new(Session::new(SessionConfig::from_env()));
    connection
        .register_table_function_with_extra_info::<LoopCsvTableFunction, _>("loop_csv", &session)
        .context("Failed to register loop_csv table function")?;
    connection
        .register_table_function_with_extra_info::<LoopImagesTableFunction, _>(
            "loop_images",
            &session,
        )
        .context("Failed to register loop_images table function")?;
    Ok(())
}
