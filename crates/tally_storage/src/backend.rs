//! Transaction control trait definition.

use crate::error::StorageResult;
use std::sync::Arc;

/// The transactional boundary of a storage connection.
///
/// A unit of work calls [`begin`](Self::begin) before dispatching any
/// mapper operation, then exactly one of [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). Isolation semantics are whatever the
/// underlying connection provides.
///
/// # Invariants
///
/// - `begin` fails if a transaction is already open
/// - `commit` and `rollback` fail if no transaction is open
/// - after a successful `commit` or `rollback`, `in_transaction` is false
///
/// # Implementors
///
/// - [`super::Database`] - SQLite connection handle
pub trait TransactionControl {
    /// Opens a storage-level transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already open or the backend
    /// refuses the `BEGIN`.
    fn begin(&self) -> StorageResult<()>;

    /// Durably applies everything done since [`begin`](Self::begin).
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open or the backend refuses
    /// the `COMMIT`.
    fn commit(&self) -> StorageResult<()>;

    /// Discards everything done since [`begin`](Self::begin).
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open or the backend refuses
    /// the `ROLLBACK`.
    fn rollback(&self) -> StorageResult<()>;

    /// Returns true while a transaction is open.
    fn in_transaction(&self) -> bool;
}

impl<T: TransactionControl + ?Sized> TransactionControl for &T {
    fn begin(&self) -> StorageResult<()> {
        (**self).begin()
    }

    fn commit(&self) -> StorageResult<()> {
        (**self).commit()
    }

    fn rollback(&self) -> StorageResult<()> {
        (**self).rollback()
    }

    fn in_transaction(&self) -> bool {
        (**self).in_transaction()
    }
}

impl<T: TransactionControl + ?Sized> TransactionControl for Arc<T> {
    fn begin(&self) -> StorageResult<()> {
        (**self).begin()
    }

    fn commit(&self) -> StorageResult<()> {
        (**self).commit()
    }

    fn rollback(&self) -> StorageResult<()> {
        (**self).rollback()
    }

    fn in_transaction(&self) -> bool {
        (**self).in_transaction()
    }
}
