//! The seam between the cursor engine and a concrete database driver.
//!
//! A driver provides four pieces: a [`DriverService`] that opens connections, the
//! [`DriverConnection`] itself, prepared [`DriverStatement`]s with positional binding, and a
//! forward-only [`DriverResultSet`]. Indices passed to statements and result sets are 1-based,
//! the way SQL drivers number placeholders and columns.

use crate::config::ConnectOptions;
use crate::error::DriverError;
use crate::types::RowValues;

/// Opens driver connections.
pub trait DriverService {
    /// Open a connection to `options.target`.
    ///
    /// The login timeout travels inside `options`; implementations must not stash it in
    /// process-wide state.
    ///
    /// # Errors
    /// Returns `DriverError` if the connection cannot be established.
    fn connect(&self, options: &ConnectOptions)
    -> Result<Box<dyn DriverConnection>, DriverError>;
}

/// A live session. Shared between all cursors created from one connection.
pub trait DriverConnection: Send + Sync {
    /// Prepare `sql` as a parameterized statement.
    ///
    /// # Errors
    /// Returns `DriverError` if the statement cannot be compiled or the connection is closed.
    fn prepare(&self, sql: &str) -> Result<Box<dyn DriverStatement>, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the commit fails or transactions are unsupported.
    fn commit(&self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the rollback fails or transactions are unsupported.
    fn rollback(&self) -> Result<(), DriverError>;

    /// Release the session. A second close may fail.
    ///
    /// # Errors
    /// Returns `DriverError` if the session cannot be released.
    fn close(&self) -> Result<(), DriverError>;
}

/// A prepared statement with positional placeholders.
pub trait DriverStatement: Send {
    /// # Errors
    /// Returns `DriverError` if `index` is not a valid placeholder position.
    fn set_long(&mut self, index: usize, value: i64) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if `index` is not a valid placeholder position.
    fn set_double(&mut self, index: usize, value: f64) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if `index` is not a valid placeholder position.
    fn set_string(&mut self, index: usize, value: &str) -> Result<(), DriverError>;

    /// Bind any other value, leaving its interpretation to the driver.
    ///
    /// # Errors
    /// Returns `DriverError` if `index` is invalid or the driver cannot represent the value.
    fn set_object(&mut self, index: usize, value: &RowValues) -> Result<(), DriverError>;

    /// Whether executing this statement yields rows. `None` when the driver cannot tell.
    fn produces_result_set(&self) -> Option<bool> {
        None
    }

    /// Run the statement as an update and return the affected row count.
    ///
    /// # Errors
    /// Returns `DriverError` if execution fails.
    fn execute_update(&mut self) -> Result<i64, DriverError>;

    /// Run the statement as a query and return its open result set.
    ///
    /// # Errors
    /// Returns `DriverError` if execution fails.
    fn execute_query(&mut self) -> Result<Box<dyn DriverResultSet>, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the statement cannot be released.
    fn close(&mut self) -> Result<(), DriverError>;
}

/// Metadata for one result column, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    pub type_code: i32,
    pub display_size: i32,
    pub precision: i32,
    pub scale: i32,
    /// 0 = no nulls, 1 = nullable, 2 = unknown
    pub nullable: i32,
}

/// Forward-only cursor over a query's rows.
pub trait DriverResultSet: Send {
    /// # Errors
    /// Returns `DriverError` if the metadata cannot be read.
    fn metadata(&self) -> Result<Vec<ColumnMetadata>, DriverError>;

    /// Advance to the next row. `false` once the rows are exhausted.
    ///
    /// # Errors
    /// Returns `DriverError` if the driver fails to produce the next row.
    fn next(&mut self) -> Result<bool, DriverError>;

    /// Text form of the value, `None` for SQL NULL.
    ///
    /// # Errors
    /// Returns `DriverError` if there is no current row or `index` is out of range.
    fn get_string(&mut self, index: usize) -> Result<Option<String>, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the value cannot be read as an integer.
    fn get_long(&mut self, index: usize) -> Result<i64, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the value cannot be read as a double.
    fn get_double(&mut self, index: usize) -> Result<f64, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the value cannot be read as a boolean.
    fn get_boolean(&mut self, index: usize) -> Result<bool, DriverError>;

    /// The driver's own representation of the value.
    ///
    /// # Errors
    /// Returns `DriverError` if there is no current row or `index` is out of range.
    fn get_object(&mut self, index: usize) -> Result<RowValues, DriverError>;

    /// # Errors
    /// Returns `DriverError` if the result set cannot be released.
    fn close(&mut self) -> Result<(), DriverError>;
}
