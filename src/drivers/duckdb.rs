//! Embedded DuckDB driver. DuckDB binds `?` markers, so this driver
//! advertises the `qmark` paramstyle.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use duckdb::types::{ToSql, ToSqlOutput, Value};
use duckdb::Connection;

use crate::error::{AdbiError, Result};
use crate::traits::{Capabilities, DatabaseDriver, DriverCursor};
use crate::types::{ColumnDescription, ParamStyle, Params, ResultSet, Row, SqlValue};

/// DuckDB database driver. Statements run in autocommit mode.
pub struct DuckDbDriver {
    conn: Arc<Mutex<Connection>>,
    closed: AtomicBool,
}

impl DuckDbDriver {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| AdbiError::ConnectionFailed(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| AdbiError::ConnectionFailed(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> Result<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl DatabaseDriver for DuckDbDriver {
    fn param_style(&self) -> Option<ParamStyle> {
        Some(ParamStyle::Qmark)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            execute_script: true,
            ..Capabilities::default()
        }
    }

    async fn cursor(&self) -> Result<Box<dyn DriverCursor>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AdbiError::ConnectionFailed("connection is closed".to_string()));
        }
        Ok(Box::new(DuckDbCursor {
            conn: Arc::clone(&self.conn),
            current: ResultSet::empty(),
            array_size: 1,
        }))
    }

    async fn commit(&self) -> Result<()> {
        // autocommit: every statement is already durable
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct DuckDbCursor {
    conn: Arc<Mutex<Connection>>,
    current: ResultSet,
    array_size: usize,
}

impl DuckDbCursor {
    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AdbiError::ConnectionFailed(format!("connection mutex poisoned: {e}")))
    }
}

#[async_trait]
impl DriverCursor for DuckDbCursor {
    async fn execute(&mut self, sql: &str, params: Option<&Params>) -> Result<()> {
        let values = positional_values(params)?;
        let result = {
            let conn = self.lock()?;
            run_query(&conn, sql, values)?
        };
        self.current = result;
        Ok(())
    }

    async fn execute_many(&mut self, sql: &str, params_list: &[Params]) -> Result<()> {
        let executed = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(sql).map_err(|e| query_failed(e, sql))?;
            for params in params_list {
                let values = positional_values(Some(params))?;
                stmt.execute(duckdb::params_from_iter(values.iter()))
                    .map_err(|e| query_failed(e, sql))?;
            }
            params_list.len()
        };
        self.current = ResultSet {
            row_count: executed as i64,
            ..ResultSet::empty()
        };
        Ok(())
    }

    async fn fetch_one(&mut self) -> Result<Option<Row>> {
        Ok(self.current.next_row())
    }

    async fn fetch_many(&mut self, size: usize) -> Result<Vec<Row>> {
        Ok(self.current.take_rows(size))
    }

    async fn fetch_all(&mut self) -> Result<Vec<Row>> {
        Ok(self.current.take_all())
    }

    fn description(&self) -> Option<Vec<ColumnDescription>> {
        if self.current.columns.is_empty() {
            None
        } else {
            Some(self.current.columns.clone())
        }
    }

    fn row_count(&self) -> i64 {
        self.current.row_count
    }

    fn array_size(&self) -> usize {
        self.array_size
    }

    fn set_array_size(&mut self, size: usize) {
        self.array_size = size;
    }

    async fn close(&mut self) -> Result<()> {
        self.current = ResultSet::empty();
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> Result<()> {
        {
            let conn = self.lock()?;
            conn.execute_batch(script)
                .map_err(|e| AdbiError::QueryFailed(e.to_string()))?;
        }
        self.current = ResultSet::empty();
        Ok(())
    }
}

fn positional_values(params: Option<&Params>) -> Result<&[SqlValue]> {
    match params {
        None => Ok(&[]),
        Some(Params::Positional(values)) => Ok(values),
        Some(Params::Named(_)) => Err(AdbiError::InvalidOperation(
            "duckdb driver binds positional parameters only".to_string(),
        )),
    }
}

fn run_query(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<ResultSet> {
    let mut stmt = conn.prepare(sql).map_err(|e| query_failed(e, sql))?;
    let mut rows = stmt
        .query(duckdb::params_from_iter(params.iter()))
        .map_err(|e| query_failed(e, sql))?;

    let columns: Vec<ColumnDescription> = rows
        .as_ref()
        .map(|s| s.column_names())
        .unwrap_or_default()
        .into_iter()
        .map(ColumnDescription::new)
        .collect();

    let mut result_rows = Vec::new();
    while let Some(row) = rows.next().map_err(|e| query_failed(e, sql))? {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            let value: Value = row.get(i).map_err(|e| query_failed(e, sql))?;
            values.push(from_duckdb_value(value));
        }
        result_rows.push(Row::new(values));
    }

    Ok(ResultSet::new(columns, result_rows))
}

fn query_failed(err: duckdb::Error, sql: &str) -> AdbiError {
    AdbiError::QueryFailed(format!("{}: {}", err, sql))
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => Value::Null,
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Int32(i) => Value::Int(*i),
            SqlValue::Int64(i) => Value::BigInt(*i),
            SqlValue::Float64(f) => Value::Double(*f),
            SqlValue::Bool(b) => Value::Boolean(*b),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Convert a fetched DuckDB value. Types without a `SqlValue` counterpart
/// come back as their debug text.
fn from_duckdb_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(b),
        Value::TinyInt(i) => SqlValue::Int32(i32::from(i)),
        Value::SmallInt(i) => SqlValue::Int32(i32::from(i)),
        Value::Int(i) => SqlValue::Int32(i),
        Value::BigInt(i) => SqlValue::Int64(i),
        Value::UTinyInt(i) => SqlValue::Int32(i32::from(i)),
        Value::USmallInt(i) => SqlValue::Int32(i32::from(i)),
        Value::UInt(i) => SqlValue::Int64(i64::from(i)),
        Value::UBigInt(i) => match i64::try_from(i) {
            Ok(v) => SqlValue::Int64(v),
            Err(_) => SqlValue::Text(i.to_string()),
        },
        Value::HugeInt(i) => match i64::try_from(i) {
            Ok(v) => SqlValue::Int64(v),
            Err(_) => SqlValue::Text(i.to_string()),
        },
        Value::Float(f) => SqlValue::Float64(f64::from(f)),
        Value::Double(f) => SqlValue::Float64(f),
        Value::Text(s) => SqlValue::Text(s),
        other => SqlValue::Text(format!("{other:?}")),
    }
}
