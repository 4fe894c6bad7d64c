//! Thin synchronous wrapper around the embedded SQLite engine
//!
//! - Every statement runs in the engine's autocommit mode: one statement,
//!   one transaction, committed before `execute` returns
//! - All result rows are fetched eagerly
//! - The engine handle is released exactly once, when the connection drops

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;

use super::errors::{NativeError, NativeResult};
use super::values::{from_sql_value, to_sql_value, Row};
use crate::observability::Logger;

/// Location shown for in-memory stores
pub const IN_MEMORY: &str = ":memory:";

/// Owned handle to one SQLite store
///
/// The handle sits behind a mutex so one connection can be shared across
/// table entities and request threads; the engine itself still serializes
/// writers.
pub struct NativeConnection {
    location: String,
    conn: Mutex<Connection>,
}

impl NativeConnection {
    /// Open (or create) the store at `path`
    ///
    /// Passing a password fails: encrypted stores are not supported.
    pub fn open(path: impl AsRef<Path>, password: Option<&str>) -> NativeResult<Self> {
        if password.is_some() {
            return Err(NativeError::EncryptionUnsupported);
        }
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Ok(Self::from_handle(path.display().to_string(), conn))
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> NativeResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_handle(IN_MEMORY.to_string(), conn))
    }

    fn from_handle(location: String, conn: Connection) -> Self {
        Logger::info("CONNECTION_OPENED", &[("location", location.as_str())]);
        Self {
            location,
            conn: Mutex::new(conn),
        }
    }

    /// Store location this connection was opened with
    pub fn location(&self) -> &str {
        &self.location
    }

    fn handle(&self) -> NativeResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| NativeError::Poisoned)
    }

    /// Run one statement and return every result row
    ///
    /// Mutating statements return an empty list unless they carry a
    /// `RETURNING` clause.
    pub fn execute(&self, statement: &str, params: &[Value]) -> NativeResult<Vec<Row>> {
        let conn = self.handle()?;
        let mut stmt = conn.prepare(statement)?;

        let decl_types: Vec<Option<String>> = stmt
            .columns()
            .iter()
            .map(|c| c.decl_type().map(str::to_string))
            .collect();
        let bound: Vec<SqlValue> = params.iter().map(to_sql_value).collect();

        let mut rows = stmt.query(params_from_iter(bound.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(decl_types.len());
            for (i, decl_type) in decl_types.iter().enumerate() {
                let raw: SqlValue = row.get(i)?;
                values.push(from_sql_value(raw, decl_type.as_deref()));
            }
            out.push(values);
        }
        Ok(out)
    }

    /// Run one row-less statement and return the number of rows it changed
    pub fn execute_count(&self, statement: &str, params: &[Value]) -> NativeResult<usize> {
        let conn = self.handle()?;
        let bound: Vec<SqlValue> = params.iter().map(to_sql_value).collect();
        Ok(conn.execute(statement, params_from_iter(bound.iter()))?)
    }

    /// Whether a table named `name` exists in the store
    pub fn table_exists(&self, name: &str) -> NativeResult<bool> {
        let conn = self.handle()?;
        let mut stmt =
            conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        Ok(stmt.exists([name])?)
    }

    /// Engine maintenance compaction
    ///
    /// Blocks for a time proportional to the store size.
    pub fn vacuum(&self) -> NativeResult<()> {
        let conn = self.handle()?;
        conn.execute_batch("VACUUM")?;
        Logger::info("VACUUM_COMPLETE", &[("location", self.location.as_str())]);
        Ok(())
    }
}

impl Drop for NativeConnection {
    fn drop(&mut self) {
        Logger::info("CONNECTION_CLOSED", &[("location", self.location.as_str())]);
    }
}
