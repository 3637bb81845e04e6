use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::driver::{DriverConnection, DriverStatement};
use crate::error::DriverError;
use crate::statement_kind::is_dml;

use super::statement::SqliteStatement;

/// The rusqlite handle shared by a connection and its statements. `None` once closed.
pub(crate) type SharedSqliteConnection = Arc<Mutex<Option<rusqlite::Connection>>>;

/// Run `func` against the open handle.
pub(crate) fn with_connection<F, R>(conn: &SharedSqliteConnection, func: F) -> Result<R, DriverError>
where
    F: FnOnce(&rusqlite::Connection) -> Result<R, DriverError>,
{
    let guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
    let handle = guard.as_ref().ok_or_else(DriverError::connection_closed)?;
    func(handle)
}

/// Open `BEGIN` before a row-changing statement unless a transaction is already open.
///
/// DDL, `VACUUM`, `ATTACH` and transaction control run as issued.
pub(crate) fn begin_if_needed(handle: &rusqlite::Connection, sql: &str) -> Result<(), DriverError> {
    if handle.is_autocommit() && is_dml(sql) {
        debug!("sqlite implicit BEGIN");
        handle.execute_batch("BEGIN")?;
    }
    Ok(())
}

/// A `SQLite` session implementing [`DriverConnection`].
#[derive(Debug)]
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    autocommit: bool,
}

impl SqliteConnection {
    pub(crate) fn new(conn: rusqlite::Connection, autocommit: bool) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            autocommit,
        }
    }

    fn end_transaction(&self, verb: &str) -> Result<(), DriverError> {
        with_connection(&self.conn, |handle| {
            if !handle.is_autocommit() {
                handle.execute_batch(verb)?;
                Ok(())
            } else if self.autocommit {
                Err(DriverError::new("database in auto-commit mode").with_sql_state("25000"))
            } else {
                Ok(())
            }
        })
    }
}

impl DriverConnection for SqliteConnection {
    fn prepare(&self, sql: &str) -> Result<Box<dyn DriverStatement>, DriverError> {
        let column_count = with_connection(&self.conn, |handle| {
            let stmt = handle.prepare_cached(sql)?;
            Ok(stmt.column_count())
        })?;
        Ok(Box::new(SqliteStatement::new(
            Arc::clone(&self.conn),
            sql,
            column_count,
            self.autocommit,
        )))
    }

    fn commit(&self) -> Result<(), DriverError> {
        self.end_transaction("COMMIT")
    }

    fn rollback(&self) -> Result<(), DriverError> {
        self.end_transaction("ROLLBACK")
    }

    fn close(&self) -> Result<(), DriverError> {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = guard
            .take()
            .ok_or_else(|| DriverError::new("connection already closed").with_sql_state("08003"))?;
        if let Err((handle, err)) = handle.close() {
            *guard = Some(handle);
            return Err(err.into());
        }
        Ok(())
    }
}
