use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Statement;
use rusqlite::types::Value;

use crate::connection::ConnectionDescriptor;
use crate::error::SqlDialectError;
use crate::results::ResultSet;
use crate::schema::{IntrospectionDriver, IntrospectionQuery};
use crate::types::{Dialect, RowValues};

/// Runs introspection pragmas on a `rusqlite` connection.
pub struct SqliteDriver {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteDriver {
    #[must_use]
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// # Errors
    /// Returns `SqlDialectError::SqliteError` if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqlDialectError> {
        Ok(Self::new(rusqlite::Connection::open(path)?))
    }

    /// # Errors
    /// Returns `SqlDialectError::SqliteError` if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, SqlDialectError> {
        Ok(Self::new(rusqlite::Connection::open_in_memory()?))
    }

    /// Open whatever a `sqlite:` descriptor points at; no database or `:memory:` means in-memory.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ConfigError` for non-sqlite descriptors, or the open error.
    pub fn from_descriptor(desc: &ConnectionDescriptor) -> Result<Self, SqlDialectError> {
        if desc.dialect() != Some(Dialect::Sqlite) {
            return Err(SqlDialectError::ConfigError(format!(
                "driver {} is not sqlite",
                desc.driver
            )));
        }
        match desc.database.as_deref() {
            None | Some(":memory:") => Self::open_in_memory(),
            Some(path) => Self::open(path),
        }
    }

    /// Run a batch of statements, e.g. schema setup.
    ///
    /// # Errors
    /// Returns `SqlDialectError::SqliteError` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqlDialectError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>, SqlDialectError> {
        self.conn.lock().map_err(|e| {
            SqlDialectError::ExecutionError(format!("sqlite connection poisoned: {e}"))
        })
    }
}

#[async_trait]
impl IntrospectionDriver for SqliteDriver {
    async fn fetch(&self, query: &IntrospectionQuery) -> Result<ResultSet, SqlDialectError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&query.sql)?;
        build_result_set(&mut stmt)
    }
}

fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlDialectError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

fn build_result_set(stmt: &mut Statement) -> Result<ResultSet, SqlDialectError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
