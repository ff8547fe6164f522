//! Statement backend seam
//!
//! The adapter only needs a handful of facts about an executed statement; any
//! database driver can provide them by implementing [`StatementHandle`].

use super::Row;

/// An already-executed statement and its pending result data.
///
/// Implementations may assume `close` is called at most once and that no other
/// method is called after it.
pub trait StatementHandle {
    /// Rows changed by an INSERT/UPDATE/DELETE
    fn affected_rows(&self) -> u64;

    /// Backend error code of the execution, 0 on success
    fn error_code(&self) -> i32;

    /// Drain the result cursor. The cursor is one-shot: later calls return no rows.
    fn take_rows(&mut self) -> Vec<Row>;

    /// Release the underlying resource
    fn close(&mut self);
}

impl<S: StatementHandle + ?Sized> StatementHandle for Box<S> {
    fn affected_rows(&self) -> u64 {
        (**self).affected_rows()
    }

    fn error_code(&self) -> i32 {
        (**self).error_code()
    }

    fn take_rows(&mut self) -> Vec<Row> {
        (**self).take_rows()
    }

    fn close(&mut self) {
        (**self).close();
    }
}
