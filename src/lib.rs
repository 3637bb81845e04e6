//! DB-API 2.0 style connections and cursors over pluggable SQL drivers.
//!
//! A driver implements the traits in [`driver`]; [`connect`] wraps one of its sessions in a
//! [`Connection`], and each [`Cursor`] binds parameters, decides between the update and query
//! paths, and decodes rows one at a time according to the column type codes.
//!
//! ```rust
//! # #[cfg(feature = "sqlite")]
//! # fn main() -> Result<(), sql_dbapi::DbApiError> {
//! use sql_dbapi::prelude::*;
//!
//! let conn = sql_dbapi::sqlite::connect(":memory:")?;
//! let mut cur = conn.cursor();
//! cur.execute("CREATE TABLE t (id INTEGER, name TEXT)", &[])?;
//! cur.execute(
//!     "INSERT INTO t (id, name) VALUES (?, ?)",
//!     &[RowValues::Int(7), RowValues::Text("Bo".into())],
//! )?;
//! assert_eq!(cur.rowcount(), Some(1));
//!
//! cur.execute("SELECT id, name FROM t WHERE id = ?", &[RowValues::Int(7)])?;
//! let row = cur.fetchone()?.expect("one row");
//! assert_eq!(row.get("name"), Some(&RowValues::Text("Bo".into())));
//! assert!(cur.fetchone()?.is_none());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sqlite"))]
//! # fn main() {}
//! ```

pub mod config;
pub mod connection;
pub mod cursor;
pub mod datetime;
pub mod driver;
pub mod error;
pub mod prelude;
pub mod results;
pub mod statement_kind;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{ConnectOptions, ConnectOptionsBuilder, CursorOptions, StatementClassification};
pub use connection::{Connection, connect};
pub use cursor::{ColumnDescription, Cursor, CursorState};
pub use error::{DbApiError, DriverError, ErrorKind};
pub use results::Row;
pub use types::{DecodeRule, RowValues, decode_rule};

/// DB-API level implemented.
pub const APILEVEL: &str = "2.0";
/// Placeholder style: `?` positional markers.
pub const PARAMSTYLE: &str = "qmark";
/// Connections may be shared across threads; cursors may not.
pub const THREADSAFETY: u8 = 2;
