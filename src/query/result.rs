//! Single-use query result adapter
//!
//! Every accessor is terminal: it reads what it needs from the statement, closes
//! the statement, then interprets the data. A second call finds the adapter
//! closed and fails with [`Error::InvalidState`] instead of touching the handle.

use super::{Row, StatementHandle};
use crate::error::{Error, Result};
use std::mem;

const CLOSED: &str = "query result already consumed; its statement is closed";

/// Outcome of a lookup that expects exactly one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleRow {
    /// The query produced no rows
    Empty,
    /// The query produced exactly one row
    One(Row),
    /// The query produced this many rows (two or more)
    Ambiguous(usize),
}

impl SingleRow {
    fn from_rows(mut rows: Vec<Row>) -> Self {
        match rows.len() {
            0 => Self::Empty,
            1 => rows.pop().map_or(Self::Empty, Self::One),
            n => Self::Ambiguous(n),
        }
    }

    /// The row when there was exactly one
    pub fn into_row(self) -> Option<Row> {
        match self {
            Self::One(row) => Some(row),
            Self::Empty | Self::Ambiguous(_) => None,
        }
    }
}

enum State<S> {
    Open(S),
    Closed,
}

/// Wraps one executed statement and releases it exactly once.
pub struct QueryResult<S: StatementHandle> {
    state: State<S>,
}

impl<S: StatementHandle> QueryResult<S> {
    /// Wrap a statement that has already been executed
    pub const fn new(statement: S) -> Self {
        Self {
            state: State::Open(statement),
        }
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Whether the statement changed at least one row
    pub fn affected_rows_non_zero(&mut self) -> Result<bool> {
        let affected = self.consume(|stmt| stmt.affected_rows())?;
        Ok(affected > 0)
    }

    /// Whether the statement changed exactly `rows` rows
    pub fn affected_rows_equal(&mut self, rows: u64) -> Result<bool> {
        let affected = self.consume(|stmt| stmt.affected_rows())?;
        Ok(affected == rows)
    }

    /// Call `visit` for every row in the order the backend returned them.
    ///
    /// Returns `false` without calling `visit` when there are no rows.
    pub fn for_each_row<F>(&mut self, mut visit: F) -> Result<bool>
    where
        F: FnMut(&Row),
    {
        let rows = self.consume(S::take_rows)?;
        if rows.is_empty() {
            return Ok(false);
        }
        for row in &rows {
            visit(row);
        }
        Ok(true)
    }

    /// Classify the result set as empty, a single row, or ambiguous
    pub fn single_row(&mut self) -> Result<SingleRow> {
        let rows = self.consume(S::take_rows)?;
        Ok(SingleRow::from_rows(rows))
    }

    /// First column of the only row.
    ///
    /// `None` unless there is exactly one row; also `None` when that value is NULL.
    pub fn scalar_or_null(&mut self) -> Result<Option<String>> {
        let value = self.single_row()?.into_row().and_then(|row| {
            row.value_at(0)
                .flatten()
                .map(ToString::to_string)
        });
        Ok(value)
    }

    /// The only row, or `None` for zero or several rows
    pub fn row_or_null(&mut self) -> Result<Option<Row>> {
        Ok(self.single_row()?.into_row())
    }

    /// Whether the statement executed without a backend error
    pub fn succeeded(&mut self) -> Result<bool> {
        let code = self.consume(|stmt| stmt.error_code())?;
        Ok(code == 0)
    }

    /// Release the statement without reading anything
    pub fn close(&mut self) -> Result<()> {
        self.consume(|_| ())
    }

    /// Read from the open statement, then close it. Fails if already closed.
    fn consume<T>(&mut self, read: impl FnOnce(&mut S) -> T) -> Result<T> {
        match mem::replace(&mut self.state, State::Closed) {
            State::Open(mut stmt) => {
                let value = read(&mut stmt);
                stmt.close();
                Ok(value)
            }
            State::Closed => Err(Error::InvalidState(CLOSED)),
        }
    }
}

impl<S: StatementHandle> Drop for QueryResult<S> {
    fn drop(&mut self) {
        if let State::Open(stmt) = &mut self.state {
            tracing::debug!("closing unused query result");
            stmt.close();
            self.state = State::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeStatement {
        affected: u64,
        errno: i32,
        rows: Vec<Row>,
        closes: Rc<Cell<u32>>,
    }

    impl FakeStatement {
        fn with_rows(rows: Vec<Row>) -> (Self, Rc<Cell<u32>>) {
            let closes = Rc::new(Cell::new(0));
            let stmt = Self {
                affected: 0,
                errno: 0,
                rows,
                closes: Rc::clone(&closes),
            };
            (stmt, closes)
        }

        fn with_affected(affected: u64) -> (Self, Rc<Cell<u32>>) {
            let (mut stmt, closes) = Self::with_rows(Vec::new());
            stmt.affected = affected;
            (stmt, closes)
        }
    }

    impl StatementHandle for FakeStatement {
        fn affected_rows(&self) -> u64 {
            assert_eq!(self.closes.get(), 0, "read after close");
            self.affected
        }

        fn error_code(&self) -> i32 {
            assert_eq!(self.closes.get(), 0, "read after close");
            self.errno
        }

        fn take_rows(&mut self) -> Vec<Row> {
            assert_eq!(self.closes.get(), 0, "read after close");
            mem::take(&mut self.rows)
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn user(id: &str, name: &str) -> Row {
        Row::new().with("id", Some(id)).with("name", Some(name))
    }

    #[test]
    fn test_affected_rows_checks() {
        for k in [0_u64, 1, 5] {
            let (stmt, closes) = FakeStatement::with_affected(k);
            assert_eq!(QueryResult::new(stmt).affected_rows_non_zero().unwrap(), k > 0);
            assert_eq!(closes.get(), 1);

            let (stmt, _) = FakeStatement::with_affected(k);
            assert!(QueryResult::new(stmt).affected_rows_equal(k).unwrap());

            let (stmt, _) = FakeStatement::with_affected(k);
            assert!(!QueryResult::new(stmt).affected_rows_equal(k + 1).unwrap());
        }
    }

    #[test]
    fn test_single_row_lookups() {
        let (stmt, closes) = FakeStatement::with_rows(vec![user("7", "x")]);
        assert_eq!(
            QueryResult::new(stmt).scalar_or_null().unwrap(),
            Some("7".to_string())
        );
        assert_eq!(closes.get(), 1);

        let (stmt, _) = FakeStatement::with_rows(vec![user("7", "x")]);
        assert_eq!(
            QueryResult::new(stmt).row_or_null().unwrap(),
            Some(user("7", "x"))
        );
    }

    #[test]
    fn test_single_row_rejects_zero_and_many() {
        for rows in [Vec::new(), vec![user("1", "a"), user("2", "b")]] {
            let (stmt, _) = FakeStatement::with_rows(rows.clone());
            assert_eq!(QueryResult::new(stmt).scalar_or_null().unwrap(), None);

            let (stmt, closes) = FakeStatement::with_rows(rows);
            assert_eq!(QueryResult::new(stmt).row_or_null().unwrap(), None);
            assert_eq!(closes.get(), 1);
        }
    }

    #[test]
    fn test_single_row_distinguishes_empty_from_ambiguous() {
        let (stmt, _) = FakeStatement::with_rows(Vec::new());
        assert_eq!(QueryResult::new(stmt).single_row().unwrap(), SingleRow::Empty);

        let (stmt, _) = FakeStatement::with_rows(vec![user("1", "a"), user("2", "b")]);
        assert_eq!(
            QueryResult::new(stmt).single_row().unwrap(),
            SingleRow::Ambiguous(2)
        );
    }

    #[test]
    fn test_scalar_null_value() {
        let row = Row::new().with("deleted_at", None::<String>);
        let (stmt, _) = FakeStatement::with_rows(vec![row]);
        assert_eq!(QueryResult::new(stmt).scalar_or_null().unwrap(), None);
    }

    #[test]
    fn test_for_each_row_visits_in_backend_order() {
        let rows = vec![user("1", "a"), user("2", "b"), user("3", "c")];
        let (stmt, closes) = FakeStatement::with_rows(rows);

        let mut seen = Vec::new();
        let had_rows = QueryResult::new(stmt)
            .for_each_row(|row| seen.push(row.get("name").flatten().unwrap_or("").to_string()))
            .unwrap();

        assert!(had_rows);
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_for_each_row_empty() {
        let (stmt, closes) = FakeStatement::with_rows(Vec::new());
        let mut calls = 0;
        let had_rows = QueryResult::new(stmt).for_each_row(|_| calls += 1).unwrap();
        assert!(!had_rows);
        assert_eq!(calls, 0);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_succeeded_ignores_rows() {
        let (mut stmt, _) = FakeStatement::with_rows(vec![user("1", "a")]);
        stmt.affected = 3;
        assert!(QueryResult::new(stmt).succeeded().unwrap());

        let (mut stmt, closes) = FakeStatement::with_affected(0);
        stmt.errno = 1062;
        assert!(!QueryResult::new(stmt).succeeded().unwrap());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_second_accessor_is_invalid_state() {
        let (stmt, closes) = FakeStatement::with_rows(vec![user("7", "x")]);
        let mut result = QueryResult::new(stmt);

        assert!(result.scalar_or_null().unwrap().is_some());
        assert!(result.is_closed());
        assert!(matches!(result.row_or_null(), Err(Error::InvalidState(_))));
        assert!(matches!(result.succeeded(), Err(Error::InvalidState(_))));
        assert!(matches!(result.close(), Err(Error::InvalidState(_))));

        drop(result);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_explicit_close() {
        let (stmt, closes) = FakeStatement::with_rows(vec![user("7", "x")]);
        let mut result = QueryResult::new(stmt);
        result.close().unwrap();
        assert_eq!(closes.get(), 1);
        assert!(matches!(
            result.for_each_row(|_| {}),
            Err(Error::InvalidState(_))
        ));
        drop(result);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_drop_closes_unused_result() {
        let (stmt, closes) = FakeStatement::with_affected(1);
        let result = QueryResult::new(stmt);
        assert!(!result.is_closed());
        drop(result);
        assert_eq!(closes.get(), 1);
    }
}
