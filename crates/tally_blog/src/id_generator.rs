//! Identity issuing for new posts and comments.

use crate::schema::{COMMENTS_TABLE, POSTS_TABLE};
use parking_lot::Mutex;
use std::collections::HashMap;
use tally_core::UowResult;
use tally_storage::Database;
use tracing::trace;

/// Issues IDs for entities that have not been persisted yet.
///
/// The next ID of a table is one past the larger of the highest persisted
/// ID and the last ID this generator issued. Several IDs can therefore be
/// handed out before the commit that persists them without colliding.
/// IDs issued for a commit that later fails are not reused.
#[derive(Debug)]
pub struct IdGenerator {
    db: Database,
    issued: Mutex<HashMap<&'static str, i64>>,
}

impl IdGenerator {
    /// Creates a generator reading the tables of `db`.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a fresh post ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the current maximum cannot be read.
    pub fn next_post_id(&self) -> UowResult<i64> {
        self.next(POSTS_TABLE)
    }

    /// Returns a fresh comment ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the current maximum cannot be read.
    pub fn next_comment_id(&self) -> UowResult<i64> {
        self.next(COMMENTS_TABLE)
    }

    fn next(&self, table: &'static str) -> UowResult<i64> {
        let sql = format!("SELECT COALESCE(MAX(id), 0) FROM {table}");
        let persisted: i64 = self
            .db
            .query_row(&sql, (), |row| row.get(0))?
            .unwrap_or(0);

        let mut issued = self.issued.lock();
        let last = issued.entry(table).or_insert(0);
        let id = persisted.max(*last) + 1;
        *last = id;
        trace!(table, id, "id issued");
        Ok(id)
    }
}
