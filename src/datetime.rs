//! Date and time constructors in the DB-API style.
//!
//! The `*_from_ticks` variants interpret seconds since the Unix epoch in the local time zone.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{DbApiError, DriverError};
use crate::types::RowValues;

fn invalid(what: &str, detail: String) -> DbApiError {
    DbApiError::DataError(
        DriverError::new(format!("invalid {what}: {detail}")).with_sql_state("22007"),
    )
}

fn naive_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DbApiError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| invalid("date", format!("{year:04}-{month:02}-{day:02}")))
}

fn naive_time(hour: u32, minute: u32, second: u32) -> Result<NaiveTime, DbApiError> {
    NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| invalid("time", format!("{hour:02}:{minute:02}:{second:02}")))
}

/// # Errors
/// Returns `DbApiError::DataError` if the fields do not form a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> Result<RowValues, DbApiError> {
    naive_date(year, month, day).map(RowValues::Date)
}

/// # Errors
/// Returns `DbApiError::DataError` if the fields do not form a time of day.
pub fn time(hour: u32, minute: u32, second: u32) -> Result<RowValues, DbApiError> {
    naive_time(hour, minute, second).map(RowValues::Time)
}

/// # Errors
/// Returns `DbApiError::DataError` if the fields do not form a valid timestamp.
pub fn timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<RowValues, DbApiError> {
    let date = naive_date(year, month, day)?;
    let time = naive_time(hour, minute, second)?;
    Ok(RowValues::Timestamp(NaiveDateTime::new(date, time)))
}

fn local_from_ticks(ticks: i64) -> Result<NaiveDateTime, DbApiError> {
    DateTime::from_timestamp(ticks, 0)
        .map(|utc| utc.with_timezone(&Local).naive_local())
        .ok_or_else(|| invalid("ticks", ticks.to_string()))
}

/// # Errors
/// Returns `DbApiError::DataError` if `ticks` is outside the representable range.
pub fn date_from_ticks(ticks: i64) -> Result<RowValues, DbApiError> {
    local_from_ticks(ticks).map(|dt| RowValues::Date(dt.date()))
}

/// # Errors
/// Returns `DbApiError::DataError` if `ticks` is outside the representable range.
pub fn time_from_ticks(ticks: i64) -> Result<RowValues, DbApiError> {
    local_from_ticks(ticks).map(|dt| RowValues::Time(dt.time()))
}

/// # Errors
/// Returns `DbApiError::DataError` if `ticks` is outside the representable range.
pub fn timestamp_from_ticks(ticks: i64) -> Result<RowValues, DbApiError> {
    local_from_ticks(ticks).map(RowValues::Timestamp)
}
