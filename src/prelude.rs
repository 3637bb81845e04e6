//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{ConnectOptions, CursorOptions, StatementClassification};
pub use crate::connection::{Connection, connect};
pub use crate::cursor::{ColumnDescription, Cursor, CursorState};
pub use crate::datetime::{
    date, date_from_ticks, time, time_from_ticks, timestamp, timestamp_from_ticks,
};
pub use crate::driver::{
    ColumnMetadata, DriverConnection, DriverResultSet, DriverService, DriverStatement,
};
pub use crate::error::{DbApiError, DriverError, ErrorKind};
pub use crate::results::Row;
pub use crate::types::{RowValues, sql_types};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDriver, SqliteOptions};
