use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// Values that can be bound as statement parameters or returned from a row.
///
/// The same enum is used by every driver so calling code never branches on driver types:
/// ```rust
/// use sql_dbapi::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Exact decimal, for DECIMAL/NUMERIC columns
    Decimal(Decimal),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// Binary data
    Blob(Vec<u8>),
    /// NULL value
    Null,
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_decimal(&self) -> Option<&Decimal> {
        if let RowValues::Decimal(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        if let RowValues::Date(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// Driver type codes, numbered as in `java.sql.Types`.
pub mod sql_types {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
    pub const NULL: i32 = 0;
    pub const BOOLEAN: i32 = 16;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const ROWID: i32 = -8;
    pub const OTHER: i32 = 1111;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const DISTINCT: i32 = 2001;
    pub const STRUCT: i32 = 2002;
    pub const ARRAY: i32 = 2003;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const REF: i32 = 2006;
    pub const DATALINK: i32 = 70;
    pub const NCLOB: i32 = 2011;
    pub const SQLXML: i32 = 2009;
}

/// How a column's values are decoded, chosen from its driver type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeRule {
    /// `get_long`
    Integer,
    /// `get_double`
    Float,
    /// the NULL check read itself
    Text,
    /// `get_boolean`
    Boolean,
    /// exact decimal parsed from the driver's string form
    Decimal,
    /// `get_object`, passed through as-is
    Object,
}

/// Total mapping from driver type code to decode rule. Unknown codes pass through as objects.
#[must_use]
pub fn decode_rule(type_code: i32) -> DecodeRule {
    use sql_types::*;
    match type_code {
        BIGINT | BIT | INTEGER | SMALLINT | TINYINT => DecodeRule::Integer,
        DOUBLE | FLOAT | REAL => DecodeRule::Float,
        LONGVARCHAR | CHAR | NULL | VARCHAR | LONGNVARCHAR | NVARCHAR | NCHAR => DecodeRule::Text,
        BOOLEAN => DecodeRule::Boolean,
        NUMERIC | DECIMAL => DecodeRule::Decimal,
        _ => DecodeRule::Object,
    }
}
