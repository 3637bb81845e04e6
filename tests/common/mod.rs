#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sql_dbapi::prelude::*;

/// Shared record of every driver call, in order.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// What the scripted database answers. Every prepared statement sees the same script.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub columns: Vec<ColumnMetadata>,
    pub rows: Vec<Vec<RowValues>>,
    pub update_count: i64,
    pub produces_result_set: Option<bool>,
    pub fail_connect: Option<DriverError>,
    pub fail_prepare: Option<DriverError>,
    pub fail_execute: Option<DriverError>,
    pub fail_typed_reads: Option<DriverError>,
    pub fail_close: bool,
}

impl Script {
    pub fn query(columns: Vec<ColumnMetadata>, rows: Vec<Vec<RowValues>>) -> Self {
        Self {
            columns,
            rows,
            produces_result_set: Some(true),
            ..Self::default()
        }
    }

    pub fn update(count: i64) -> Self {
        Self {
            update_count: count,
            produces_result_set: Some(false),
            ..Self::default()
        }
    }
}

pub fn column(name: &str, type_code: i32) -> ColumnMetadata {
    ColumnMetadata {
        name: name.to_string(),
        type_code,
        display_size: 10,
        precision: 10,
        scale: 0,
        nullable: 1,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    pub script: Arc<Script>,
    pub log: CallLog,
}

impl ScriptedDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            log: CallLog::default(),
        }
    }

    pub fn open(&self) -> Connection {
        connect(self, &ConnectOptions::new("scripted")).unwrap()
    }
}

impl DriverService for ScriptedDriver {
    fn connect(
        &self,
        options: &ConnectOptions,
    ) -> Result<Box<dyn DriverConnection>, DriverError> {
        self.log.push(format!(
            "connect {} timeout={}",
            options.target, options.login_timeout_secs
        ));
        if let Some(err) = &self.script.fail_connect {
            return Err(err.clone());
        }
        Ok(Box::new(ScriptedConnection {
            script: Arc::clone(&self.script),
            log: self.log.clone(),
        }))
    }
}

struct ScriptedConnection {
    script: Arc<Script>,
    log: CallLog,
}

impl DriverConnection for ScriptedConnection {
    fn prepare(&self, sql: &str) -> Result<Box<dyn DriverStatement>, DriverError> {
        self.log.push(format!("prepare {sql}"));
        if let Some(err) = &self.script.fail_prepare {
            return Err(err.clone());
        }
        Ok(Box::new(ScriptedStatement {
            script: Arc::clone(&self.script),
            log: self.log.clone(),
        }))
    }

    fn commit(&self) -> Result<(), DriverError> {
        self.log.push("commit");
        Ok(())
    }

    fn rollback(&self) -> Result<(), DriverError> {
        self.log.push("rollback");
        Ok(())
    }

    fn close(&self) -> Result<(), DriverError> {
        self.log.push("connection.close");
        Ok(())
    }
}

struct ScriptedStatement {
    script: Arc<Script>,
    log: CallLog,
}

impl DriverStatement for ScriptedStatement {
    fn set_long(&mut self, index: usize, value: i64) -> Result<(), DriverError> {
        self.log.push(format!("set_long {index} {value}"));
        Ok(())
    }

    fn set_double(&mut self, index: usize, value: f64) -> Result<(), DriverError> {
        self.log.push(format!("set_double {index} {value}"));
        Ok(())
    }

    fn set_string(&mut self, index: usize, value: &str) -> Result<(), DriverError> {
        self.log.push(format!("set_string {index} {value}"));
        Ok(())
    }

    fn set_object(&mut self, index: usize, value: &RowValues) -> Result<(), DriverError> {
        self.log.push(format!("set_object {index} {value:?}"));
        Ok(())
    }

    fn produces_result_set(&self) -> Option<bool> {
        self.script.produces_result_set
    }

    fn execute_update(&mut self) -> Result<i64, DriverError> {
        self.log.push("execute_update");
        if let Some(err) = &self.script.fail_execute {
            return Err(err.clone());
        }
        Ok(self.script.update_count)
    }

    fn execute_query(&mut self) -> Result<Box<dyn DriverResultSet>, DriverError> {
        self.log.push("execute_query");
        if let Some(err) = &self.script.fail_execute {
            return Err(err.clone());
        }
        Ok(Box::new(ScriptedResultSet {
            script: Arc::clone(&self.script),
            log: self.log.clone(),
            cursor: 0,
        }))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.log.push("statement.close");
        if self.script.fail_close {
            return Err(DriverError::new("statement close failed"));
        }
        Ok(())
    }
}

struct ScriptedResultSet {
    script: Arc<Script>,
    log: CallLog,
    /// 1-based position of the current row; 0 before the first `next`.
    cursor: usize,
}

impl ScriptedResultSet {
    fn cell(&self, index: usize) -> Result<&RowValues, DriverError> {
        self.script
            .rows
            .get(self.cursor.wrapping_sub(1))
            .and_then(|row| row.get(index - 1))
            .ok_or_else(|| DriverError::new(format!("no value at column {index}")))
    }

    fn typed_read(&self, name: &str, index: usize) -> Result<&RowValues, DriverError> {
        self.log.push(format!("{name} {index}"));
        if let Some(err) = &self.script.fail_typed_reads {
            return Err(err.clone());
        }
        self.cell(index)
    }
}

impl DriverResultSet for ScriptedResultSet {
    fn metadata(&self) -> Result<Vec<ColumnMetadata>, DriverError> {
        Ok(self.script.columns.clone())
    }

    fn next(&mut self) -> Result<bool, DriverError> {
        if self.cursor < self.script.rows.len() {
            self.cursor += 1;
            Ok(true)
        } else {
            self.cursor = self.script.rows.len() + 1;
            Ok(false)
        }
    }

    fn get_string(&mut self, index: usize) -> Result<Option<String>, DriverError> {
        self.log.push(format!("get_string {index}"));
        Ok(match self.cell(index)? {
            RowValues::Null => None,
            RowValues::Int(i) => Some(i.to_string()),
            RowValues::Float(f) => Some(f.to_string()),
            RowValues::Text(s) => Some(s.clone()),
            RowValues::Bool(b) => Some(b.to_string()),
            RowValues::Decimal(d) => Some(d.to_string()),
            other => Some(format!("{other:?}")),
        })
    }

    fn get_long(&mut self, index: usize) -> Result<i64, DriverError> {
        match self.typed_read("get_long", index)? {
            RowValues::Int(i) => Ok(*i),
            other => Err(DriverError::new(format!("not a long: {other:?}"))),
        }
    }

    fn get_double(&mut self, index: usize) -> Result<f64, DriverError> {
        match self.typed_read("get_double", index)? {
            RowValues::Float(f) => Ok(*f),
            other => Err(DriverError::new(format!("not a double: {other:?}"))),
        }
    }

    fn get_boolean(&mut self, index: usize) -> Result<bool, DriverError> {
        match self.typed_read("get_boolean", index)? {
            RowValues::Bool(b) => Ok(*b),
            other => Err(DriverError::new(format!("not a boolean: {other:?}"))),
        }
    }

    fn get_object(&mut self, index: usize) -> Result<RowValues, DriverError> {
        self.typed_read("get_object", index).cloned()
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.log.push("result_set.close");
        if self.script.fail_close {
            return Err(DriverError::new("result set close failed"));
        }
        Ok(())
    }
}
