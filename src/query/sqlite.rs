//! SQLite statement backend
//!
//! Executes a prepared `rusqlite` statement and captures everything the adapter
//! needs: the change count, the extended error code and the buffered rows.

use super::{QueryResult, Row, StatementHandle};
use crate::error::{Error, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params, Statement};
use std::path::Path;
use std::sync::Mutex;

/// Generic SQLite error code, used when a failure carries no code of its own
const SQLITE_ERROR: i32 = 1;

/// SQLite database handle shared across requests
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::InvalidState("database connection lock poisoned"))?;
        Ok(f(&conn))
    }
}

/// An executed SQLite statement
pub struct SqliteStatement<'conn> {
    stmt: Option<Statement<'conn>>,
    affected: u64,
    errno: i32,
    rows: Vec<Row>,
}

impl<'conn> SqliteStatement<'conn> {
    /// Execute `stmt` with `params`.
    ///
    /// Statements that produce columns are queried and their rows buffered; all
    /// others are executed for their change count. Execution failures are
    /// recorded as an error code rather than returned.
    pub fn execute<P: Params>(mut stmt: Statement<'conn>, params: P) -> Self {
        let outcome = if stmt.column_count() > 0 {
            fetch_rows(&mut stmt, params).map(|rows| (0, rows))
        } else {
            stmt.execute(params)
                .map(|changes| (u64::try_from(changes).unwrap_or(u64::MAX), Vec::new()))
        };

        let (affected, errno, rows) = match outcome {
            Ok((affected, rows)) => (affected, 0, rows),
            Err(e) => {
                tracing::debug!(error = %e, "statement execution failed");
                (0, error_code(&e), Vec::new())
            }
        };

        Self {
            stmt: Some(stmt),
            affected,
            errno,
            rows,
        }
    }

    /// Wrap this statement in a single-use [`QueryResult`]
    pub fn into_result(self) -> QueryResult<Self> {
        QueryResult::new(self)
    }
}

impl StatementHandle for SqliteStatement<'_> {
    fn affected_rows(&self) -> u64 {
        self.affected
    }

    fn error_code(&self) -> i32 {
        self.errno
    }

    fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    fn close(&mut self) {
        self.rows.clear();
        if let Some(stmt) = self.stmt.take() {
            if let Err(e) = stmt.finalize() {
                tracing::warn!(error = %e, "failed to finalize statement");
            }
        }
    }
}

/// Prepare `sql` on `conn`, execute it with `params` and wrap the outcome.
///
/// Only preparation errors are returned; execution errors are observed through
/// [`QueryResult::succeeded`].
pub fn execute<'conn, P: Params>(
    conn: &'conn Connection,
    sql: &str,
    params: P,
) -> Result<QueryResult<SqliteStatement<'conn>>> {
    let stmt = conn.prepare(sql)?;
    // Writes with a RETURNING clause take the query path, which reports no changes
    let returning = stmt.column_count() > 0 && !stmt.readonly();
    let mut statement = SqliteStatement::execute(stmt, params);
    if returning && statement.errno == 0 {
        statement.affected = u64::try_from(conn.changes()).unwrap_or(u64::MAX);
    }
    Ok(statement.into_result())
}

fn fetch_rows<P: Params>(stmt: &mut Statement<'_>, params: P) -> rusqlite::Result<Vec<Row>> {
    let names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();

    let mut cursor = stmt.query(params)?;
    let mut rows = Vec::new();
    while let Some(record) = cursor.next()? {
        let mut row = Row::new();
        for (index, name) in names.iter().enumerate() {
            row.push(name.as_str(), value_to_text(record.get_ref(index)?));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(n) => Some(n.to_string()),
        ValueRef::Real(n) => Some(n.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn error_code(err: &rusqlite::Error) -> i32 {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => failure.extended_code,
        _ => SQLITE_ERROR,
    }
}
