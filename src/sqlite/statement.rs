use std::collections::VecDeque;

use rusqlite::types::Value;

use crate::driver::{ColumnMetadata, DriverResultSet, DriverStatement};
use crate::error::DriverError;
use crate::statement_kind::is_dml;
use crate::types::RowValues;

use super::connection::{SharedSqliteConnection, begin_if_needed, with_connection};
use super::params::{Params, row_value_to_sqlite_value};
use super::result_set::SqliteResultSet;
use super::types::{
    declared_precision_scale, default_display_size, type_code_for_decl, type_code_for_values,
};

/// Prepared statement handle.
///
/// Holds the SQL text and the bound values; the compiled statement itself lives in rusqlite's
/// per-connection cache and is fetched with `prepare_cached` on every execution.
#[derive(Debug)]
pub struct SqliteStatement {
    conn: SharedSqliteConnection,
    sql: String,
    column_count: usize,
    autocommit: bool,
    params: Params,
    closed: bool,
}

impl SqliteStatement {
    pub(crate) fn new(
        conn: SharedSqliteConnection,
        sql: &str,
        column_count: usize,
        autocommit: bool,
    ) -> Self {
        Self {
            conn,
            sql: sql.to_owned(),
            column_count,
            autocommit,
            params: Params::default(),
            closed: false,
        }
    }

    fn bind(&mut self, index: usize, value: Value) -> Result<(), DriverError> {
        self.ensure_open()?;
        if index == 0 {
            return Err(DriverError::new("parameter index starts at 1").with_sql_state("07009"));
        }
        self.params.set(index, value);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed {
            Err(DriverError::new("statement is closed"))
        } else {
            Ok(())
        }
    }

    fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), DriverError> {
        let values = self.params.complete(stmt.parameter_count()).map_err(|position| {
            DriverError::new(format!("no value bound for parameter {position}"))
                .with_sql_state("07001")
        })?;
        if self.params.len() > stmt.parameter_count() {
            return Err(DriverError::new(format!(
                "{} parameters bound but the statement takes {}",
                self.params.len(),
                stmt.parameter_count()
            ))
            .with_sql_state("07001"));
        }
        for (offset, value) in values.into_iter().enumerate() {
            stmt.raw_bind_parameter(offset + 1, value)?;
        }
        Ok(())
    }

}

impl DriverStatement for SqliteStatement {
    fn set_long(&mut self, index: usize, value: i64) -> Result<(), DriverError> {
        self.bind(index, Value::Integer(value))
    }

    fn set_double(&mut self, index: usize, value: f64) -> Result<(), DriverError> {
        self.bind(index, Value::Real(value))
    }

    fn set_string(&mut self, index: usize, value: &str) -> Result<(), DriverError> {
        self.bind(index, Value::Text(value.to_owned()))
    }

    fn set_object(&mut self, index: usize, value: &RowValues) -> Result<(), DriverError> {
        self.bind(index, row_value_to_sqlite_value(value))
    }

    fn produces_result_set(&self) -> Option<bool> {
        Some(self.column_count > 0)
    }

    fn execute_update(&mut self) -> Result<i64, DriverError> {
        self.ensure_open()?;
        with_connection(&self.conn, |handle| {
            if !self.autocommit {
                begin_if_needed(handle, &self.sql)?;
            }
            let mut stmt = handle.prepare_cached(&self.sql)?;
            self.bind_all(&mut stmt)?;
            let changed = stmt.raw_execute()?;
            if is_dml(&self.sql) {
                Ok(i64::try_from(changed).unwrap_or(i64::MAX))
            } else {
                Ok(0)
            }
        })
    }

    fn execute_query(&mut self) -> Result<Box<dyn DriverResultSet>, DriverError> {
        self.ensure_open()?;
        let (decls, rows) = with_connection(&self.conn, |handle| {
            let mut stmt = handle.prepare_cached(&self.sql)?;
            self.bind_all(&mut stmt)?;
            let decls: Vec<(String, Option<String>)> = stmt
                .columns()
                .iter()
                .map(|col| (col.name().to_owned(), col.decl_type().map(str::to_owned)))
                .collect();

            let mut buffered = VecDeque::new();
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(decls.len());
                for idx in 0..decls.len() {
                    values.push(Value::from(row.get_ref(idx)?));
                }
                buffered.push_back(values);
            }
            Ok((decls, buffered))
        })?;

        let columns = decls
            .into_iter()
            .enumerate()
            .map(|(idx, (name, decl))| column_metadata(name, decl.as_deref(), &rows, idx))
            .collect();
        Ok(Box::new(SqliteResultSet::new(columns, rows)))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.closed = true;
        Ok(())
    }
}

fn column_metadata(
    name: String,
    decl: Option<&str>,
    rows: &VecDeque<Vec<Value>>,
    idx: usize,
) -> ColumnMetadata {
    let type_code = match decl {
        Some(decl) => type_code_for_decl(decl),
        None => type_code_for_values(rows.iter().filter_map(|row| row.get(idx))),
    };
    let (precision, scale) = decl.and_then(declared_precision_scale).unwrap_or((0, 0));
    let display_size = if precision > 0 {
        precision
    } else {
        default_display_size(type_code)
    };
    ColumnMetadata {
        name,
        type_code,
        display_size,
        precision,
        scale,
        nullable: 2,
    }
}
