use std::fmt;

use thiserror::Error;

/// A failure reported by a driver, before it is classified into the DB-API taxonomy.
///
/// Drivers fill in `sql_state` (five-character SQLSTATE) and `vendor_code` when they know them;
/// [`DbApiError::from`] uses the SQLSTATE class to pick a finer error kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub message: String,
    pub sql_state: Option<String>,
    pub vendor_code: Option<i32>,
}

impl DriverError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql_state: None,
            vendor_code: None,
        }
    }

    #[must_use]
    pub fn with_sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    #[must_use]
    pub fn with_vendor_code(mut self, vendor_code: i32) -> Self {
        self.vendor_code = Some(vendor_code);
        self
    }

    /// Connection handle used after it was closed.
    #[must_use]
    pub fn connection_closed() -> Self {
        Self::new("connection is closed").with_sql_state("08003")
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DriverError {}

/// The DB-API exception classes as a flat set of kinds.
///
/// The "is-a" relations of the taxonomy are available through [`ErrorKind::parent`] and
/// [`ErrorKind::is_a`]: every kind below `DatabaseError` is also a `DatabaseError`, and every
/// kind except `Warning` is an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Warning,
    Error,
    InterfaceError,
    DatabaseError,
    DataError,
    OperationalError,
    IntegrityError,
    InternalError,
    ProgrammingError,
    NotSupportedError,
}

impl ErrorKind {
    #[must_use]
    pub fn parent(self) -> Option<ErrorKind> {
        match self {
            ErrorKind::Warning | ErrorKind::Error => None,
            ErrorKind::InterfaceError | ErrorKind::DatabaseError => Some(ErrorKind::Error),
            ErrorKind::DataError
            | ErrorKind::OperationalError
            | ErrorKind::IntegrityError
            | ErrorKind::InternalError
            | ErrorKind::ProgrammingError
            | ErrorKind::NotSupportedError => Some(ErrorKind::DatabaseError),
        }
    }

    /// True when `self` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn is_a(self, ancestor: ErrorKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Map a SQLSTATE to the kind its class implies, if the class is one we distinguish.
    #[must_use]
    pub fn from_sql_state(sql_state: &str) -> Option<ErrorKind> {
        if sql_state.starts_with("HYT") {
            return Some(ErrorKind::OperationalError);
        }
        match sql_state.get(..2)? {
            "22" => Some(ErrorKind::DataError),
            "23" => Some(ErrorKind::IntegrityError),
            "08" | "40" | "53" | "57" | "58" => Some(ErrorKind::OperationalError),
            "07" | "21" | "42" => Some(ErrorKind::ProgrammingError),
            "0A" => Some(ErrorKind::NotSupportedError),
            "XX" => Some(ErrorKind::InternalError),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbApiError {
    #[error("Warning: {0}")]
    Warning(DriverError),

    #[error("Error: {0}")]
    Error(DriverError),

    #[error("Interface error: {0}")]
    InterfaceError(DriverError),

    #[error("Database error: {0}")]
    DatabaseError(DriverError),

    #[error("Data error: {0}")]
    DataError(DriverError),

    #[error("Operational error: {0}")]
    OperationalError(DriverError),

    #[error("Integrity error: {0}")]
    IntegrityError(DriverError),

    #[error("Internal error: {0}")]
    InternalError(DriverError),

    #[error("Programming error: {0}")]
    ProgrammingError(DriverError),

    #[error("Not supported: {0}")]
    NotSupportedError(DriverError),
}

impl DbApiError {
    /// Build an error of the given kind around a driver failure.
    #[must_use]
    pub fn of_kind(kind: ErrorKind, source: DriverError) -> Self {
        match kind {
            ErrorKind::Warning => DbApiError::Warning(source),
            ErrorKind::Error => DbApiError::Error(source),
            ErrorKind::InterfaceError => DbApiError::InterfaceError(source),
            ErrorKind::DatabaseError => DbApiError::DatabaseError(source),
            ErrorKind::DataError => DbApiError::DataError(source),
            ErrorKind::OperationalError => DbApiError::OperationalError(source),
            ErrorKind::IntegrityError => DbApiError::IntegrityError(source),
            ErrorKind::InternalError => DbApiError::InternalError(source),
            ErrorKind::ProgrammingError => DbApiError::ProgrammingError(source),
            ErrorKind::NotSupportedError => DbApiError::NotSupportedError(source),
        }
    }

    /// Plain `DatabaseError` with a message and no driver codes.
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        DbApiError::DatabaseError(DriverError::new(message))
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbApiError::Warning(_) => ErrorKind::Warning,
            DbApiError::Error(_) => ErrorKind::Error,
            DbApiError::InterfaceError(_) => ErrorKind::InterfaceError,
            DbApiError::DatabaseError(_) => ErrorKind::DatabaseError,
            DbApiError::DataError(_) => ErrorKind::DataError,
            DbApiError::OperationalError(_) => ErrorKind::OperationalError,
            DbApiError::IntegrityError(_) => ErrorKind::IntegrityError,
            DbApiError::InternalError(_) => ErrorKind::InternalError,
            DbApiError::ProgrammingError(_) => ErrorKind::ProgrammingError,
            DbApiError::NotSupportedError(_) => ErrorKind::NotSupportedError,
        }
    }

    #[must_use]
    pub fn is_a(&self, ancestor: ErrorKind) -> bool {
        self.kind().is_a(ancestor)
    }

    #[must_use]
    pub fn driver_error(&self) -> &DriverError {
        match self {
            DbApiError::Warning(e)
            | DbApiError::Error(e)
            | DbApiError::InterfaceError(e)
            | DbApiError::DatabaseError(e)
            | DbApiError::DataError(e)
            | DbApiError::OperationalError(e)
            | DbApiError::IntegrityError(e)
            | DbApiError::InternalError(e)
            | DbApiError::ProgrammingError(e)
            | DbApiError::NotSupportedError(e) => e,
        }
    }

    /// The underlying driver message, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.driver_error().message
    }

    #[must_use]
    pub fn sql_state(&self) -> Option<&str> {
        self.driver_error().sql_state.as_deref()
    }
}

/// Driver failures become `DatabaseError`, refined by SQLSTATE class when the driver reports one.
impl From<DriverError> for DbApiError {
    fn from(err: DriverError) -> Self {
        let kind = err
            .sql_state
            .as_deref()
            .and_then(ErrorKind::from_sql_state)
            .unwrap_or(ErrorKind::DatabaseError);
        DbApiError::of_kind(kind, err)
    }
}
