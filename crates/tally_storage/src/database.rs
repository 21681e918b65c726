//! SQLite connection handle.

use crate::backend::TransactionControl;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// A shared SQLite connection.
///
/// `Database` is a cheap-to-clone handle: every clone talks to the same
/// underlying connection, so the mappers of an application and the unit of
/// work that brackets their calls with `BEGIN` / `COMMIT` all observe one
/// transaction.
///
/// # Thread Safety
///
/// The connection sits behind a mutex. Each call locks it for the duration
/// of a single statement; transaction bracketing is the caller's job.
///
/// # Example
///
/// ```rust
/// use tally_storage::{params, Database};
///
/// let db = Database::open_in_memory().unwrap();
/// db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY)").unwrap();
/// db.execute("INSERT INTO t (id) VALUES (?1)", params![7]).unwrap();
/// assert!(db.exists("SELECT 1 FROM t WHERE id = ?1", params![7]).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens or creates a database file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot open or create the file.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens or creates a database file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Opens a private in-memory database.
    ///
    /// Useful for tests and throwaway runs; contents vanish with the last clone.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Returns the path of the database file, or `None` when in memory.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Executes a single parameterized statement.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails to prepare or execute.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> StorageResult<usize> {
        trace!(sql, "execute");
        let changed = self.conn.lock().execute(sql, params)?;
        Ok(changed)
    }

    /// Executes one or more statements without parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> StorageResult<()> {
        trace!(sql, "execute batch");
        self.conn.lock().execute_batch(sql)?;
        Ok(())
    }

    /// Runs a query expected to return at most one row.
    ///
    /// Returns `None` when the query yields no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or `map` rejects the row.
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> StorageResult<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        trace!(sql, "query row");
        let row = self.conn.lock().query_row(sql, params, map).optional()?;
        Ok(row)
    }

    /// Runs a query and maps every returned row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or `map` rejects any row.
    pub fn query_map<T, P, F>(&self, sql: &str, params: P, map: F) -> StorageResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        trace!(sql, "query map");
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Returns true if the query yields at least one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn exists<P: Params>(&self, sql: &str, params: P) -> StorageResult<bool> {
        Ok(self.query_row(sql, params, |_| Ok(()))?.is_some())
    }
}

impl TransactionControl for Database {
    fn begin(&self) -> StorageResult<()> {
        let conn = self.conn.lock();
        if !conn.is_autocommit() {
            return Err(StorageError::TransactionAlreadyActive);
        }
        conn.execute_batch("BEGIN")?;
        debug!("storage transaction started");
        Ok(())
    }

    fn commit(&self) -> StorageResult<()> {
        let conn = self.conn.lock();
        if conn.is_autocommit() {
            return Err(StorageError::NoActiveTransaction);
        }
        conn.execute_batch("COMMIT")?;
        debug!("storage transaction committed");
        Ok(())
    }

    fn rollback(&self) -> StorageResult<()> {
        let conn = self.conn.lock();
        if conn.is_autocommit() {
            return Err(StorageError::NoActiveTransaction);
        }
        conn.execute_batch("ROLLBACK")?;
        debug!("storage transaction rolled back");
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        !self.conn.lock().is_autocommit()
    }
}
