// SQLite driver - implements the driver traits on top of rusqlite
//
// This module is split into several sub-modules:
// - config: driver options and the DriverService entry point
// - connection: the shared session, commit/rollback/close
// - statement: positional binding and update/query execution
// - result_set: buffered rows and the JDBC-style typed accessors
// - params / types / error: value, type-code and error conversions

pub mod config;
pub mod connection;
pub mod error;
pub mod params;
pub mod result_set;
pub mod statement;
pub mod types;

// Re-export the public API
pub use config::{SqliteDriver, SqliteOptions, SqliteOptionsBuilder, connect};
pub use connection::SqliteConnection;
pub use result_set::SqliteResultSet;
pub use statement::SqliteStatement;
