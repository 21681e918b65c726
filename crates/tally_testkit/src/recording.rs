//! A data mapper that records what it is asked to do.

use crate::entity::Doc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use tally_core::{DataMapper, Entity, EntityKey, EntityKind, MapperOp, UowError, UowResult};
use tally_storage::StorageError;

/// One recorded mapper call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperCall {
    /// The operation.
    pub op: MapperOp,
    /// The entity it was called for.
    pub key: EntityKey,
    /// The entity body the mapper received.
    pub body: String,
}

/// Shared, ordered log of mapper calls.
///
/// Clones share the same log, so several mappers can write into one log
/// and a test can keep a handle after the mappers move into a registry.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<MapperCall>>>,
}

impl CallLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: MapperCall) {
        self.calls.lock().push(call);
    }

    /// Returns a copy of every call so far, oldest first.
    pub fn calls(&self) -> Vec<MapperCall> {
        self.calls.lock().clone()
    }

    /// Returns `(op, key)` pairs, oldest first.
    pub fn ops(&self) -> Vec<(MapperOp, EntityKey)> {
        self.calls.lock().iter().map(|c| (c.op, c.key)).collect()
    }

    /// Returns the operations issued for `key`.
    pub fn ops_for(&self, key: EntityKey) -> Vec<MapperOp> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.key == key)
            .map(|c| c.op)
            .collect()
    }

    /// Returns how many calls used `op`.
    pub fn count(&self, op: MapperOp) -> usize {
        self.calls.lock().iter().filter(|c| c.op == op).count()
    }

    /// Returns the total number of calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if no call was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Forgets every recorded call.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

/// A [`DataMapper`] for [`Doc`] that records calls into a [`CallLog`].
///
/// Calls registered with [`fail_on`](Self::fail_on) return a storage error
/// instead of being recorded.
#[derive(Debug)]
pub struct RecordingMapper {
    kind: EntityKind,
    log: CallLog,
    failures: Mutex<HashSet<(MapperOp, EntityKey)>>,
}

impl RecordingMapper {
    /// Creates a mapper for `kind` writing into `log`.
    pub fn new(kind: EntityKind, log: CallLog) -> Self {
        Self {
            kind,
            log,
            failures: Mutex::new(HashSet::new()),
        }
    }

    /// Makes `op` fail for `key`.
    pub fn fail_on(&self, op: MapperOp, key: EntityKey) {
        self.failures.lock().insert((op, key));
    }

    /// Returns the error injected failures produce.
    pub fn injected_error(op: MapperOp, key: EntityKey) -> UowError {
        UowError::Storage(StorageError::Io(io::Error::other(format!(
            "injected {op} failure for {key}"
        ))))
    }

    fn call(&self, op: MapperOp, doc: &Doc) -> UowResult<()> {
        if doc.kind() != self.kind {
            return Err(UowError::kind_mismatch(self.kind, doc.kind()));
        }
        let key = doc.key();
        if self.failures.lock().contains(&(op, key)) {
            return Err(Self::injected_error(op, key));
        }
        self.log.push(MapperCall {
            op,
            key,
            body: doc.body.clone(),
        });
        Ok(())
    }
}

impl DataMapper<Doc> for RecordingMapper {
    fn insert(&self, entity: &Doc) -> UowResult<()> {
        self.call(MapperOp::Insert, entity)
    }

    fn update(&self, entity: &Doc) -> UowResult<()> {
        self.call(MapperOp::Update, entity)
    }

    fn delete(&self, entity: &Doc) -> UowResult<()> {
        self.call(MapperOp::Delete, entity)
    }
}
