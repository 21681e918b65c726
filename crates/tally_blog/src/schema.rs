//! Tables used by the blog mappers.

use tally_storage::{Database, StorageResult};
use tracing::debug;

/// Table holding posts.
pub const POSTS_TABLE: &str = "posts";

/// Table holding comments.
pub const COMMENTS_TABLE: &str = "comments";

/// DDL for every blog table. Safe to run repeatedly.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY,
    text TEXT NOT NULL,
    post_id INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments (post_id);
";

/// Creates the blog tables if they are missing.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub fn install(db: &Database) -> StorageResult<()> {
    db.execute_batch(SCHEMA)?;
    debug!("blog schema installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        install(&db).unwrap();
        install(&db).unwrap();

        for table in [POSTS_TABLE, COMMENTS_TABLE] {
            assert!(db
                .exists(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                )
                .unwrap());
        }
    }
}
