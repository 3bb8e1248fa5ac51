use duckdb::vtab::Value;
use libduckdb_sys::{
    duckdb_free, duckdb_get_bool, duckdb_get_int64, duckdb_get_list_child, duckdb_get_list_size,
    duckdb_get_varchar, duckdb_value,
};
use std::{ffi::CStr, os::raw::c_void};

/// Extends DuckDB's `Value` with the typed accessors the named parameters need,
/// going through the raw `duckdb_value` handle it wraps.
pub(crate) trait ValueBridge {
    /// Extracts the raw `duckdb_value` pointer from the `Value` struct.
    ///
    /// # Safety
    ///
    /// Relies on `Value` being a plain wrapper around a single `duckdb_value`
    /// field. That layout is an implementation detail of duckdb-rs and is only
    /// known to hold for the pinned version; any change to it makes every
    /// accessor of this trait undefined behavior.
    unsafe fn get_value_ptr(&self) -> duckdb_value;

    /// Returns the value as a boolean
    fn to_bool(&self) -> bool {
        unsafe { duckdb_get_bool(self.get_value_ptr()) }
    }

    /// Returns the value as an i64
    fn to_int64(&self) -> i64 {
        unsafe { duckdb_get_int64(self.get_value_ptr()) }
    }

    /// Returns the value as a String
    fn to_varchar(&self) -> String {
        unsafe {
            let varchar = duckdb_get_varchar(self.get_value_ptr());
            let c_str = CStr::from_ptr(varchar);
            let string = c_str.to_string_lossy().into_owned();
            duckdb_free(varchar as *mut c_void);
            string
        }
    }

    /// Returns the children of a list value
    fn to_list(&self) -> Vec<Value> {
        unsafe {
            let size = duckdb_get_list_size(self.get_value_ptr());
            (0..size)
                .map(|index| Value::from(duckdb_get_list_child(self.get_value_ptr(), index)))
                .collect()
        }
    }
}

impl ValueBridge for Value {
    /// Reinterprets the `Value` reference as its single `duckdb_value` field.
    unsafe fn get_value_ptr(&self) -> duckdb_value {
        *(self as *const Value as *const duckdb_value)
    }
}
