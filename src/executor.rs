//! Statement execution.
//!
//! `TideExecutor` is the seam between compiled statements and an actual
//! database; `SqliteExecutor` is the bundled implementation. Everything
//! above this module deals purely in SQL text, positional parameters and
//! `Rows`, so tests can substitute an executor that records or fails.

use std::path::Path;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, ToSql};

use crate::error::TideError;
use crate::value::{format_timestamp, Value};

/// A raw result set: column names plus one cell vector per row. `None`
/// cells are SQL NULLs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

/// Executes compiled statements against a database.
pub trait TideExecutor {
    /// Run DDL or other parameterless statements.
    fn execute(&self, sql: &str) -> Result<(), TideError>;

    /// Run a statement with positional parameters, discarding any rows.
    fn run(&self, sql: &str, params: &[Option<Value>]) -> Result<(), TideError>;

    /// Run a statement and collect the full result set.
    fn query(&self, sql: &str, params: &[Option<Value>]) -> Result<Rows, TideError>;

    /// Run a statement and return the first cell of the first row.
    fn scalar(&self, sql: &str, params: &[Option<Value>]) -> Result<Option<Value>, TideError>;

    /// Rowid assigned by the most recent insert on this connection.
    fn last_insert_id(&self) -> i64;
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i as i64)),
            Value::BigInt(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Double(f) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*f)),
            Value::Boolean(b) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b)))
            }
            Value::Timestamp(ts) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Text(format_timestamp(*ts)))
            }
        })
    }
}

/// Executor over a SQLite database file or an in-memory database.
pub struct SqliteExecutor {
    conn: rusqlite::Connection,
}

impl SqliteExecutor {
    /// Open (creating if absent) a database file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TideError> {
        Ok(SqliteExecutor {
            conn: rusqlite::Connection::open(path)?,
        })
    }

    /// Open a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Fails if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, TideError> {
        Ok(SqliteExecutor {
            conn: rusqlite::Connection::open_in_memory()?,
        })
    }

    /// The underlying rusqlite connection, for anything the trait does not
    /// cover.
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

fn read_cell(cell: ValueRef<'_>) -> Result<Option<Value>, TideError> {
    match cell {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(Value::BigInt(i))),
        ValueRef::Real(f) => Ok(Some(Value::Double(f))),
        ValueRef::Text(text) => Ok(Some(Value::Text(
            String::from_utf8_lossy(text).into_owned(),
        ))),
        ValueRef::Blob(_) => Err(TideError::Execution(
            "blob columns are not supported".to_string(),
        )),
    }
}

impl TideExecutor for SqliteExecutor {
    fn execute(&self, sql: &str) -> Result<(), TideError> {
        Ok(self.conn.execute_batch(sql)?)
    }

    fn run(&self, sql: &str, params: &[Option<Value>]) -> Result<(), TideError> {
        let mut stmt = self.conn.prepare(sql)?;
        stmt.execute(params_from_iter(params.iter()))?;
        Ok(())
    }

    fn query(&self, sql: &str, params: &[Option<Value>]) -> Result<Rows, TideError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = (0..stmt.column_count())
            .map(|i| stmt.column_name(i).map(str::to_string))
            .collect::<Result<_, _>>()?;

        let mut raw = stmt.query(params_from_iter(params.iter()))?;
        let mut rows = Vec::new();
        while let Some(row) = raw.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                cells.push(read_cell(row.get_ref(i)?)?);
            }
            rows.push(cells);
        }
        Ok(Rows { columns, rows })
    }

    fn scalar(&self, sql: &str, params: &[Option<Value>]) -> Result<Option<Value>, TideError> {
        let rows = self.query(sql, params)?;
        Ok(rows
            .rows
            .into_iter()
            .next()
            .and_then(|cells| cells.into_iter().next())
            .flatten())
    }

    fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}
