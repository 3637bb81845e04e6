use std::sync::Arc;

use tracing::debug;

use crate::config::{ConnectOptions, CursorOptions};
use crate::cursor::Cursor;
use crate::driver::{DriverConnection, DriverService};
use crate::error::DbApiError;

/// Open a connection through `service`.
///
/// # Errors
/// Returns `DbApiError::Error` carrying the driver's message if the connection cannot be
/// established.
pub fn connect(
    service: &dyn DriverService,
    options: &ConnectOptions,
) -> Result<Connection, DbApiError> {
    debug!(target_db = %options.target, login_timeout_secs = options.login_timeout_secs, "connect");
    let conn = service.connect(options).map_err(DbApiError::Error)?;
    Ok(Connection::new(Arc::from(conn)))
}

/// A DB-API connection. Cursors created from it share the same driver session.
pub struct Connection {
    inner: Arc<dyn DriverConnection>,
    cursor_options: CursorOptions,
}

impl Connection {
    #[must_use]
    pub fn new(inner: Arc<dyn DriverConnection>) -> Self {
        Self {
            inner,
            cursor_options: CursorOptions::default(),
        }
    }

    /// Options applied to cursors created by [`Connection::cursor`].
    #[must_use]
    pub fn with_cursor_options(mut self, options: CursorOptions) -> Self {
        self.cursor_options = options;
        self
    }

    /// # Errors
    /// Returns a `DatabaseError`-family error if the driver cannot commit.
    pub fn commit(&self) -> Result<(), DbApiError> {
        debug!("commit");
        self.inner.commit().map_err(DbApiError::from)
    }

    /// # Errors
    /// Returns a `DatabaseError`-family error if the driver cannot roll back.
    pub fn rollback(&self) -> Result<(), DbApiError> {
        debug!("rollback");
        self.inner.rollback().map_err(DbApiError::from)
    }

    /// Close the driver session. Closing twice is left to the driver and may fail.
    ///
    /// # Errors
    /// Returns a `DatabaseError`-family error if the driver cannot release the session.
    pub fn close(&self) -> Result<(), DbApiError> {
        debug!("close connection");
        self.inner.close().map_err(DbApiError::from)
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor_with(self.cursor_options)
    }

    #[must_use]
    pub fn cursor_with(&self, options: CursorOptions) -> Cursor {
        Cursor::new(Arc::clone(&self.inner), options)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("cursor_options", &self.cursor_options)
            .finish_non_exhaustive()
    }
}
