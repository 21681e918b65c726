//! # Tally Storage
//!
//! The storage boundary used by Tally's transactional unit of work.
//!
//! This crate provides the lowest-level abstraction in the workspace:
//!
//! - [`TransactionControl`] - the `BEGIN` / `COMMIT` / `ROLLBACK` contract a
//!   unit of work drives around each commit
//! - [`Database`] - a cloneable SQLite connection handle with parameterized
//!   statement execution, shared between data mappers and the unit of work
//!
//! Storage knows nothing about entities or lifecycle states. Table layout is
//! owned by whoever installs the schema.
//!
//! ## Example
//!
//! ```rust
//! use tally_storage::{params, Database, TransactionControl};
//!
//! let db = Database::open_in_memory().unwrap();
//! db.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)").unwrap();
//!
//! db.begin().unwrap();
//! db.execute("INSERT INTO notes (id, body) VALUES (?1, ?2)", params![1, "hello"]).unwrap();
//! db.commit().unwrap();
//!
//! let body: Option<String> = db
//!     .query_row("SELECT body FROM notes WHERE id = ?1", params![1], |row| row.get(0))
//!     .unwrap();
//! assert_eq!(body.as_deref(), Some("hello"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod database;
mod error;

pub use backend::TransactionControl;
pub use database::Database;
pub use error::{StorageError, StorageResult};

pub use rusqlite::{params, Params, Row};
