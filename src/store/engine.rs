//! Engine boundary
//!
//! The store only needs two things from a SQL engine: run a batch of
//! statements, and stream the rows of a query as text. [`SqliteEngine`]
//! is the production implementation over bundled SQLite.

use std::path::Path;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use super::errors::{StoreError, StoreResult};

/// Callback receiving column names and one row of textual values.
/// `None` is SQL NULL.
pub type RowCallback<'c> = dyn FnMut(&[String], &[Option<String>]) -> StoreResult<()> + 'c;

/// Opens connections to a database file
pub trait Engine: Send + Sync {
    type Connection: EngineConnection;

    fn open(&self, path: &Path) -> StoreResult<Self::Connection>;
}

/// One open connection. Dropping it closes the connection.
pub trait EngineConnection {
    /// Executes one or more statements, discarding any rows
    fn execute_batch(&mut self, sql: &str) -> StoreResult<()>;

    /// Runs `sql` and calls `on_row` for every result row, in order.
    /// An error from `on_row` stops the iteration and is returned.
    fn query(&mut self, sql: &str, on_row: &mut RowCallback<'_>) -> StoreResult<()>;
}

/// SQLite through `rusqlite`
#[derive(Debug, Clone, Default)]
pub struct SqliteEngine {
    busy_timeout: Option<Duration>,
}

impl SqliteEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout
    }
}

impl Engine for SqliteEngine {
    type Connection = SqliteConnection;

    fn open(&self, path: &Path) -> StoreResult<SqliteConnection> {
        let open_err = |e: rusqlite::Error| StoreError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let conn = Connection::open(path).map_err(open_err)?;
        if let Some(timeout) = self.busy_timeout {
            conn.busy_timeout(timeout).map_err(open_err)?;
        }

        Ok(SqliteConnection { conn })
    }
}

/// An open SQLite connection
pub struct SqliteConnection {
    conn: Connection,
}

impl EngineConnection for SqliteConnection {
    fn execute_batch(&mut self, sql: &str) -> StoreResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| StoreError::execution(sql, e.to_string()))
    }

    fn query(&mut self, sql: &str, on_row: &mut RowCallback<'_>) -> StoreResult<()> {
        let exec_err = |e: rusqlite::Error| StoreError::execution(sql, e.to_string());

        let mut stmt = self.conn.prepare(sql).map_err(exec_err)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([]).map_err(exec_err)?;
        let mut values = Vec::with_capacity(names.len());
        while let Some(row) = rows.next().map_err(exec_err)? {
            values.clear();
            for i in 0..names.len() {
                let value = row.get_ref(i).map_err(exec_err)?;
                values.push(value_to_text(value));
            }
            on_row(&names, &values)?;
        }

        Ok(())
    }
}

/// Textual form of a column value, the way SQLite's `sqlite3_column_text`
/// would present it
fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
