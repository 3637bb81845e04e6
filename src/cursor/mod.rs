//! The cursor engine: positional binding, update/query dispatch, and row decoding.

mod binding;
mod decode;
mod description;

use std::sync::Arc;

use tracing::{debug, error, warn};

pub use description::ColumnDescription;

use crate::config::{CursorOptions, StatementClassification};
use crate::driver::{DriverConnection, DriverResultSet, DriverStatement};
use crate::error::{DbApiError, DriverError};
use crate::results::Row;
use crate::statement_kind::is_select_text;
use crate::types::RowValues;

/// Lifecycle of a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No statement yet.
    Idle,
    /// A statement is held but did not finish executing.
    Prepared,
    /// An update ran; `rowcount` is set.
    UpdateExecuted,
    /// A query ran; `description` is set and rows can be fetched.
    QueryOpen,
    /// Terminal.
    Closed,
}

/// A DB-API cursor over one driver connection.
///
/// A cursor owns at most one prepared statement and one open result set. It may be moved to
/// another thread but not shared between threads.
pub struct Cursor {
    connection: Arc<dyn DriverConnection>,
    statement: Option<Box<dyn DriverStatement>>,
    result_set: Option<Box<dyn DriverResultSet>>,
    state: CursorState,
    description: Vec<ColumnDescription>,
    column_names: Arc<Vec<String>>,
    rowcount: Option<i64>,
    arraysize: usize,
    classification: StatementClassification,
}

impl Cursor {
    pub(crate) fn new(connection: Arc<dyn DriverConnection>, options: CursorOptions) -> Self {
        Self {
            connection,
            statement: None,
            result_set: None,
            state: CursorState::Idle,
            description: Vec::new(),
            column_names: Arc::new(Vec::new()),
            rowcount: None,
            arraysize: options.arraysize,
            classification: options.classification,
        }
    }

    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Columns of the last successful query; empty after an update.
    #[must_use]
    pub fn description(&self) -> &[ColumnDescription] {
        &self.description
    }

    /// Rows affected by the last update; `None` after a query.
    #[must_use]
    pub fn rowcount(&self) -> Option<i64> {
        self.rowcount
    }

    #[must_use]
    pub fn arraysize(&self) -> usize {
        self.arraysize
    }

    pub fn set_arraysize(&mut self, arraysize: usize) {
        self.arraysize = arraysize;
    }

    /// Prepare `sql`, bind `params` positionally, and run it as an update or a query.
    ///
    /// Any statement or result set left over from a previous call is released first.
    ///
    /// Under the default [`StatementClassification::DriverReported`] the driver decides which
    /// path runs, so on SQLite `WITH ... SELECT` and `INSERT ... RETURNING` open a result set
    /// instead of setting `rowcount`. Use [`StatementClassification::Lexical`] to treat only text
    /// starting with `select` as a query.
    ///
    /// # Errors
    /// Returns a `DatabaseError`-family error if the cursor is closed or any driver step fails.
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<(), DbApiError> {
        if self.state == CursorState::Closed {
            return Err(DbApiError::database("cursor is closed"));
        }
        self.release_resources();
        self.description.clear();
        self.column_names = Arc::new(Vec::new());
        self.rowcount = None;
        self.state = CursorState::Idle;

        debug!(statement = sql.trim(), params = ?params, "execute");

        let stmt = self.statement.insert(self.connection.prepare(sql)?);
        self.state = CursorState::Prepared;
        binding::bind_params(&mut **stmt, params)?;

        let is_query = match self.classification {
            StatementClassification::DriverReported => stmt
                .produces_result_set()
                .unwrap_or_else(|| is_select_text(sql)),
            StatementClassification::Lexical => is_select_text(sql),
        };

        if is_query {
            let rs = stmt.execute_query()?;
            let rs = self.result_set.insert(rs);
            self.description = rs
                .metadata()?
                .iter()
                .map(ColumnDescription::from)
                .collect();
            self.column_names =
                Arc::new(self.description.iter().map(|d| d.name.clone()).collect());
            self.state = CursorState::QueryOpen;
        } else {
            self.rowcount = Some(stmt.execute_update()?);
            self.state = CursorState::UpdateExecuted;
        }
        Ok(())
    }

    /// Decode the next row, or `Ok(None)` once the result set is exhausted.
    ///
    /// # Errors
    /// Returns a `DatabaseError`-family error if no query is open or a value fails to decode.
    pub fn fetchone(&mut self) -> Result<Option<Row>, DbApiError> {
        let rs = match (self.state, self.result_set.as_mut()) {
            (CursorState::QueryOpen, Some(rs)) => rs,
            (CursorState::Closed, _) => return Err(DbApiError::database("cursor is closed")),
            _ => return Err(DbApiError::database("no result set available to fetch from")),
        };

        if !rs.next()? {
            return Ok(None);
        }

        let mut values = Vec::with_capacity(self.description.len());
        for (offset, column) in self.description.iter().enumerate() {
            let index = offset + 1;
            match decode::decode_column(&mut **rs, index, column.type_code) {
                Ok(value) => values.push(value),
                Err(e) => {
                    error!(
                        column = index,
                        column_name = %column.name,
                        type_code = column.type_code,
                        error = %e,
                        "failed to map result set value"
                    );
                    return Err(e.into());
                }
            }
        }
        Ok(Some(Row::new(Arc::clone(&self.column_names), values)))
    }

    /// Up to `size` rows (default `arraysize`), fewer once the result set runs out.
    ///
    /// # Errors
    /// Propagates the first error from [`Cursor::fetchone`].
    pub fn fetchmany(&mut self, size: Option<usize>) -> Result<Vec<Row>, DbApiError> {
        let size = size.unwrap_or(self.arraysize);
        let mut rows = Vec::with_capacity(size.min(1024));
        while rows.len() < size {
            match self.fetchone()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// All remaining rows.
    ///
    /// # Errors
    /// Propagates the first error from [`Cursor::fetchone`].
    pub fn fetchall(&mut self) -> Result<Vec<Row>, DbApiError> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetchone()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Iterate the remaining rows. Iteration ends after the first error.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows {
            cursor: self,
            done: false,
        }
    }

    /// Multiple result sets are not supported.
    ///
    /// # Errors
    /// Always returns `DbApiError::ProgrammingError`.
    pub fn nextset(&mut self) -> Result<(), DbApiError> {
        Err(DbApiError::ProgrammingError(DriverError::new("Not Implemented")))
    }

    /// Release the result set and statement. Failures are logged, never returned.
    pub fn close(&mut self) {
        self.release_resources();
        self.state = CursorState::Closed;
    }

    fn release_resources(&mut self) {
        if let Some(mut rs) = self.result_set.take() {
            if let Err(e) = rs.close() {
                warn!(error = %e, "ignored error closing result set");
            }
        }
        if let Some(mut stmt) = self.statement.take() {
            if let Err(e) = stmt.close() {
                warn!(error = %e, "ignored error closing statement");
            }
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.release_resources();
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("description", &self.description)
            .field("rowcount", &self.rowcount)
            .field("arraysize", &self.arraysize)
            .field("classification", &self.classification)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`Cursor::rows`].
pub struct Rows<'a> {
    cursor: &'a mut Cursor,
    done: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, DbApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.fetchone() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
