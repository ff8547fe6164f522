//! Query result module
//!
//! Wraps a single executed statement and exposes it through narrow, single-use
//! interpretation modes:
//! - affected-row checks for INSERT/UPDATE/DELETE
//! - single scalar / single row lookups
//! - row-by-row iteration
//! - success/failure of the execution

mod result;
mod row;
pub mod sqlite;
mod statement;

pub use result::{QueryResult, SingleRow};
pub use row::Row;
pub use sqlite::{SqliteDatabase, SqliteStatement};
pub use statement::StatementHandle;
