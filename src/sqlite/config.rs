use tracing::debug;

use crate::config::ConnectOptions;
use crate::connection::{self, Connection};
use crate::driver::{DriverConnection, DriverService};
use crate::error::{DbApiError, DriverError};

use super::connection::SqliteConnection;

/// Options for the `SQLite` driver.
#[derive(Debug, Clone, Default)]
pub struct SqliteOptions {
    /// When false, updates open a transaction that `commit`/`rollback` end.
    pub autocommit: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone, Default)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn autocommit(mut self, autocommit: bool) -> Self {
        self.opts.autocommit = autocommit;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    #[must_use]
    pub fn build(self) -> SqliteDriver {
        SqliteDriver::new(self.finish())
    }
}

/// [`DriverService`] that opens `SQLite` databases through rusqlite.
///
/// `ConnectOptions::target` is a file path or `:memory:`. User and password are ignored. A
/// login timeout becomes the connection's busy timeout.
#[derive(Debug, Clone, Default)]
pub struct SqliteDriver {
    opts: SqliteOptions,
}

impl SqliteDriver {
    #[must_use]
    pub fn new(opts: SqliteOptions) -> Self {
        Self { opts }
    }

    #[must_use]
    pub fn builder() -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new()
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.opts
    }
}

impl DriverService for SqliteDriver {
    fn connect(
        &self,
        options: &ConnectOptions,
    ) -> Result<Box<dyn DriverConnection>, DriverError> {
        let conn = if options.target == ":memory:" {
            rusqlite::Connection::open_in_memory()?
        } else {
            rusqlite::Connection::open(&options.target)?
        };
        if let Some(timeout) = options.login_timeout() {
            conn.busy_timeout(timeout)?;
        }
        debug!(path = %options.target, autocommit = self.opts.autocommit, "sqlite connection opened");
        Ok(Box::new(SqliteConnection::new(conn, self.opts.autocommit)))
    }
}

/// Open `path` with default `SQLite` options.
///
/// # Errors
/// Returns `DbApiError::Error` if the database cannot be opened.
pub fn connect(path: impl Into<String>) -> Result<Connection, DbApiError> {
    connection::connect(&SqliteDriver::default(), &ConnectOptions::new(path))
}
