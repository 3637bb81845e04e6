use rusqlite::ErrorCode;

use crate::error::DriverError;

fn sql_state_for_code(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::ConstraintViolation => Some("23000"),
        ErrorCode::TypeMismatch | ErrorCode::TooBig | ErrorCode::ParameterOutOfRange => {
            Some("22000")
        }
        ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::OperationInterrupted
        | ErrorCode::SchemaChanged => Some("40001"),
        ErrorCode::CannotOpen | ErrorCode::NotADatabase => Some("08001"),
        ErrorCode::ReadOnly
        | ErrorCode::DiskFull
        | ErrorCode::SystemIoFailure
        | ErrorCode::OutOfMemory
        | ErrorCode::DatabaseCorrupt
        | ErrorCode::FileLockingProtocolFailed
        | ErrorCode::NoLargeFileSupport
        | ErrorCode::PermissionDenied => Some("58000"),
        ErrorCode::InternalMalfunction => Some("XX000"),
        ErrorCode::AuthorizationForStatementDenied => Some("42501"),
        _ => None,
    }
}

impl From<rusqlite::Error> for DriverError {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        match &err {
            rusqlite::Error::SqliteFailure(failure, _) => {
                let driver_err = DriverError::new(message).with_vendor_code(failure.extended_code);
                match sql_state_for_code(failure.code) {
                    Some(state) => driver_err.with_sql_state(state),
                    None => driver_err,
                }
            }
            rusqlite::Error::InvalidParameterCount(..) | rusqlite::Error::InvalidParameterName(_) => {
                DriverError::new(message).with_sql_state("07001")
            }
            rusqlite::Error::InvalidColumnIndex(_) | rusqlite::Error::InvalidColumnName(_) => {
                DriverError::new(message).with_sql_state("07009")
            }
            rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::Utf8Error(_) => DriverError::new(message).with_sql_state("22000"),
            rusqlite::Error::ExecuteReturnedResults => {
                DriverError::new(message).with_sql_state("21000")
            }
            _ => DriverError::new(message),
        }
    }
}
