//! A transaction backend that records what it is asked to do.

use parking_lot::Mutex;
use std::io;
use tally_storage::{StorageError, StorageResult, TransactionControl};

/// A recorded transaction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    /// `BEGIN`
    Begin,
    /// `COMMIT`
    Commit,
    /// `ROLLBACK`
    Rollback,
}

#[derive(Debug, Default)]
struct State {
    events: Vec<TxEvent>,
    open: bool,
    refuse_begin: bool,
    refuse_commit: bool,
    refuse_rollback: bool,
}

/// A [`TransactionControl`] that logs every call.
///
/// It enforces the same open/closed rules as a real connection, and can be
/// told to refuse `BEGIN`, `COMMIT` or `ROLLBACK`. A refused `COMMIT` or
/// `ROLLBACK` leaves the transaction open, the way SQLite does when the
/// database is busy.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    state: Mutex<State>,
}

impl RecordingBackend {
    /// Creates a backend that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `begin` fail.
    pub fn refuse_begin(&self) {
        self.state.lock().refuse_begin = true;
    }

    /// Makes every later `commit` fail.
    pub fn refuse_commit(&self) {
        self.state.lock().refuse_commit = true;
    }

    /// Makes every later `rollback` fail, leaving the transaction open.
    pub fn refuse_rollback(&self) {
        self.state.lock().refuse_rollback = true;
    }

    /// Returns the recorded events, oldest first.
    pub fn events(&self) -> Vec<TxEvent> {
        self.state.lock().events.clone()
    }

    /// Forgets recorded events.
    pub fn reset(&self) {
        self.state.lock().events.clear();
    }
}

impl TransactionControl for RecordingBackend {
    fn begin(&self) -> StorageResult<()> {
        let mut state = self.state.lock();
        if state.refuse_begin {
            return Err(StorageError::Io(io::Error::other("begin refused")));
        }
        if state.open {
            return Err(StorageError::TransactionAlreadyActive);
        }
        state.events.push(TxEvent::Begin);
        state.open = true;
        Ok(())
    }

    fn commit(&self) -> StorageResult<()> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(StorageError::NoActiveTransaction);
        }
        state.events.push(TxEvent::Commit);
        if state.refuse_commit {
            return Err(StorageError::Io(io::Error::other("commit refused")));
        }
        state.open = false;
        Ok(())
    }

    fn rollback(&self) -> StorageResult<()> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(StorageError::NoActiveTransaction);
        }
        state.events.push(TxEvent::Rollback);
        if state.refuse_rollback {
            return Err(StorageError::Io(io::Error::other("rollback refused")));
        }
        state.open = false;
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.state.lock().open
    }
}
