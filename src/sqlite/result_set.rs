use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::Value;

use crate::driver::{ColumnMetadata, DriverResultSet};
use crate::error::DriverError;
use crate::types::{RowValues, sql_types};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn conversion_error(index: usize, target: &str, value: &Value) -> DriverError {
    DriverError::new(format!(
        "cannot read column {index} ({value:?}) as {target}"
    ))
    .with_sql_state("22018")
}

/// Rows of one query, buffered when the query ran, read forward one at a time.
#[derive(Debug)]
pub struct SqliteResultSet {
    columns: Vec<ColumnMetadata>,
    rows: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    closed: bool,
}

impl SqliteResultSet {
    pub(crate) fn new(columns: Vec<ColumnMetadata>, rows: VecDeque<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            current: None,
            closed: false,
        }
    }

    fn value(&self, index: usize) -> Result<&Value, DriverError> {
        if self.closed {
            return Err(DriverError::new("result set is closed"));
        }
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| DriverError::new("no current row").with_sql_state("24000"))?;
        index
            .checked_sub(1)
            .and_then(|slot| row.get(slot))
            .ok_or_else(|| {
                DriverError::new(format!("column index {index} out of range"))
                    .with_sql_state("07009")
            })
    }

    fn type_code(&self, index: usize) -> i32 {
        index
            .checked_sub(1)
            .and_then(|slot| self.columns.get(slot))
            .map_or(sql_types::NULL, |col| col.type_code)
    }
}

fn parse_calendar(type_code: i32, text: &str) -> Option<RowValues> {
    match type_code {
        sql_types::DATE => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(RowValues::Date),
        sql_types::TIME => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .ok()
            .map(RowValues::Time),
        sql_types::TIMESTAMP => TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(RowValues::Timestamp),
        _ => None,
    }
}

impl DriverResultSet for SqliteResultSet {
    fn metadata(&self) -> Result<Vec<ColumnMetadata>, DriverError> {
        Ok(self.columns.clone())
    }

    fn next(&mut self) -> Result<bool, DriverError> {
        if self.closed {
            return Err(DriverError::new("result set is closed"));
        }
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn get_string(&mut self, index: usize) -> Result<Option<String>, DriverError> {
        Ok(match self.value(index)? {
            Value::Null => None,
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
        })
    }

    fn get_long(&mut self, index: usize) -> Result<i64, DriverError> {
        let value = self.value(index)?;
        match value {
            Value::Null => Ok(0),
            Value::Integer(i) => Ok(*i),
            #[allow(clippy::cast_possible_truncation)]
            Value::Real(f) => Ok(*f as i64),
            Value::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                    .ok_or_else(|| conversion_error(index, "integer", value))
            }
            Value::Blob(_) => Err(conversion_error(index, "integer", value)),
        }
    }

    fn get_double(&mut self, index: usize) -> Result<f64, DriverError> {
        let value = self.value(index)?;
        match value {
            Value::Null => Ok(0.0),
            #[allow(clippy::cast_precision_loss)]
            Value::Integer(i) => Ok(*i as f64),
            Value::Real(f) => Ok(*f),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| conversion_error(index, "double", value)),
            Value::Blob(_) => Err(conversion_error(index, "double", value)),
        }
    }

    fn get_boolean(&mut self, index: usize) -> Result<bool, DriverError> {
        let value = self.value(index)?;
        match value {
            Value::Null => Ok(false),
            Value::Integer(i) => Ok(*i != 0),
            Value::Real(f) => Ok(*f != 0.0),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Ok(true),
                "false" | "f" | "no" | "n" | "0" => Ok(false),
                _ => Err(conversion_error(index, "boolean", value)),
            },
            Value::Blob(_) => Err(conversion_error(index, "boolean", value)),
        }
    }

    fn get_object(&mut self, index: usize) -> Result<RowValues, DriverError> {
        let type_code = self.type_code(index);
        Ok(match self.value(index)? {
            Value::Null => RowValues::Null,
            Value::Integer(i) => RowValues::Int(*i),
            Value::Real(f) => RowValues::Float(*f),
            Value::Text(s) => {
                parse_calendar(type_code, s).unwrap_or_else(|| RowValues::Text(s.clone()))
            }
            Value::Blob(b) => RowValues::Blob(b.clone()),
        })
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closed = true;
        self.current = None;
        self.rows.clear();
        Ok(())
    }
}
