use rusqlite::types::Value;

use crate::types::RowValues;

/// Convert a bound object into the `SQLite` value it is stored as.
///
/// `SQLite` has no boolean, decimal or date/time storage classes: booleans become 0/1, decimals
/// keep their exact text, and calendar values use the ISO-8601 text forms `SQLite`'s date
/// functions understand.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Decimal(d) => Value::Text(d.to_string()),
        RowValues::Date(d) => Value::Text(d.format("%F").to_string()),
        RowValues::Time(t) => Value::Text(t.format("%T%.f").to_string()),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
        RowValues::Null => Value::Null,
    }
}

/// Positional parameter slots for one statement, filled through the 1-based setters.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<Option<Value>>);

impl Params {
    pub fn set(&mut self, index: usize, value: Value) {
        let slot = index - 1;
        if self.0.len() <= slot {
            self.0.resize(slot + 1, None);
        }
        self.0[slot] = Some(value);
    }

    /// Values for positions `1..=expected`, or the first position left unbound.
    pub fn complete(&self, expected: usize) -> Result<Vec<&Value>, usize> {
        (0..expected)
            .map(|slot| self.0.get(slot).and_then(Option::as_ref).ok_or(slot + 1))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
