//! Unit of work bracketed by a storage transaction.

use crate::config::Config;
use crate::entity::Entity;
use crate::error::{UowError, UowResult};
use crate::registry::MapperRegistry;
use crate::state::ObjectState;
use crate::store::ObjectStore;
use crate::summary::CommitSummary;
use crate::types::EntityKey;
use crate::unit_of_work::{BasicUnitOfWork, UnitOfWork};
use std::sync::Arc;
use tally_storage::TransactionControl;
use tracing::{error, warn};

/// A unit of work whose commit is atomic at the storage layer.
///
/// `commit` opens a storage transaction, dispatches every pending change,
/// and then commits the transaction. If any mapper call fails, the
/// transaction is rolled back and the mapper's error is returned as is.
/// Either every insert, update and delete of the batch is applied, or none.
///
/// Tracked changes are forgotten only once the storage transaction has
/// committed. On failure they are kept (or dropped, per
/// [`Config::clear_on_failure`]).
pub struct TransactionalUnitOfWork<E, B> {
    inner: BasicUnitOfWork<E>,
    backend: B,
}

impl<E: Entity, B: TransactionControl> TransactionalUnitOfWork<E, B> {
    /// Creates a transactional unit of work with default configuration.
    #[must_use]
    pub fn new(backend: B, registry: Arc<MapperRegistry<E>>) -> Self {
        Self::with_config(backend, registry, Config::default())
    }

    /// Creates a transactional unit of work with the given configuration.
    #[must_use]
    pub fn with_config(backend: B, registry: Arc<MapperRegistry<E>>, config: Config) -> Self {
        Self {
            inner: BasicUnitOfWork::with_config(registry, config),
            backend,
        }
    }

    /// Returns the storage backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the tracked changes.
    #[must_use]
    pub fn store(&self) -> &ObjectStore<E> {
        self.inner.store()
    }

    /// Returns the shared mapper registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<MapperRegistry<E>> {
        self.inner.registry()
    }

    fn fail(&mut self, err: UowError) -> UowError {
        if let Err(rollback_err) = self.backend.rollback() {
            error!(error = %rollback_err, "rollback failed");
        }
        warn!(error = %err, "commit rolled back");
        self.inner.abandon();
        err
    }
}

impl<E: Entity, B: TransactionControl> UnitOfWork<E> for TransactionalUnitOfWork<E, B> {
    fn register_new(&mut self, entity: E) -> UowResult<()> {
        self.inner.register_new(entity)
    }

    fn register_dirty(&mut self, entity: E) -> UowResult<()> {
        self.inner.register_dirty(entity)
    }

    fn register_removed(&mut self, entity: E) -> UowResult<()> {
        self.inner.register_removed(entity)
    }

    fn register_clean(&mut self, entity: E) -> UowResult<()> {
        self.inner.register_clean(entity)
    }

    fn state_of(&self, key: &EntityKey) -> Option<ObjectState> {
        self.inner.state_of(key)
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }

    fn commit(&mut self) -> UowResult<CommitSummary> {
        if let Err(err) = self.backend.begin() {
            // Nothing is open, so there is nothing to roll back.
            self.inner.abandon();
            return Err(err.into());
        }

        let summary = match self.inner.dispatch() {
            Ok(summary) => summary,
            Err(err) => return Err(self.fail(err)),
        };

        if let Err(err) = self.backend.commit() {
            // A refused COMMIT can leave the transaction open.
            if self.backend.in_transaction() {
                return Err(self.fail(err.into()));
            }
            self.inner.abandon();
            return Err(err.into());
        }

        self.inner.finish(&summary);
        Ok(summary)
    }

    fn discard(&mut self) {
        self.inner.discard();
    }
}

impl<E: std::fmt::Debug, B> std::fmt::Debug for TransactionalUnitOfWork<E, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalUnitOfWork")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::MapperOp;
    use crate::testing::{Calls, Item, LogMapper, COMMENT, POST};
    use parking_lot::Mutex;
    use tally_storage::{StorageError, StorageResult};

    #[derive(Default)]
    struct Journal {
        events: Mutex<Vec<&'static str>>,
        open: Mutex<bool>,
        refuse_commit: bool,
    }

    impl TransactionControl for Journal {
        fn begin(&self) -> StorageResult<()> {
            self.events.lock().push("begin");
            *self.open.lock() = true;
            Ok(())
        }

        fn commit(&self) -> StorageResult<()> {
            self.events.lock().push("commit");
            if self.refuse_commit {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            *self.open.lock() = false;
            Ok(())
        }

        fn rollback(&self) -> StorageResult<()> {
            self.events.lock().push("rollback");
            *self.open.lock() = false;
            Ok(())
        }

        fn in_transaction(&self) -> bool {
            *self.open.lock()
        }
    }

    fn setup(
        journal: Arc<Journal>,
        fail_insert: Option<EntityKey>,
    ) -> (TransactionalUnitOfWork<Item, Arc<Journal>>, Calls) {
        let mapper = Arc::new(LogMapper {
            fail_insert,
            ..LogMapper::default()
        });
        let calls = mapper.calls.clone();
        let registry: MapperRegistry<Item> = MapperRegistry::new()
            .with_mapper(POST, mapper.clone())
            .with_mapper(COMMENT, mapper);
        (
            TransactionalUnitOfWork::new(journal, Arc::new(registry)),
            calls,
        )
    }

    #[test]
    fn commit_brackets_dispatch() {
        let journal = Arc::new(Journal::default());
        let (mut uow, calls) = setup(journal.clone(), None);
        uow.register_new(Item::post(1)).unwrap();

        let summary = uow.commit().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(*journal.events.lock(), vec!["begin", "commit"]);
        assert_eq!(calls.lock().len(), 1);
        assert_eq!(uow.pending(), 0);
    }

    #[test]
    fn mapper_failure_rolls_back_and_propagates() {
        let journal = Arc::new(Journal::default());
        let (mut uow, calls) = setup(journal.clone(), Some(Item::post(2).key()));
        uow.register_new(Item::post(1)).unwrap();
        uow.register_new(Item::post(2)).unwrap();

        let err = uow.commit().unwrap_err();
        assert!(matches!(
            err,
            UowError::EntityNotFound { kind, id } if kind == POST && id.as_i64() == 2
        ));
        assert_eq!(*journal.events.lock(), vec!["begin", "rollback"]);
        assert!(!journal.in_transaction());
        assert_eq!(calls.lock()[0].0, MapperOp::Insert);
        assert_eq!(uow.pending(), 2);
    }

    #[test]
    fn missing_mapper_rolls_back() {
        let journal = Arc::new(Journal::default());
        let registry: MapperRegistry<Item> = MapperRegistry::new();
        let mut uow = TransactionalUnitOfWork::new(journal.clone(), Arc::new(registry));
        uow.register_removed(Item::comment(3)).unwrap();

        assert!(matches!(
            uow.commit(),
            Err(UowError::MapperNotRegistered { .. })
        ));
        assert_eq!(*journal.events.lock(), vec!["begin", "rollback"]);
    }

    #[test]
    fn refused_commit_rolls_back_and_keeps_changes() {
        let journal = Arc::new(Journal {
            refuse_commit: true,
            ..Journal::default()
        });
        let (mut uow, _) = setup(journal.clone(), None);
        uow.register_dirty(Item::post(1)).unwrap();

        let err = uow.commit().unwrap_err();
        assert!(matches!(err, UowError::Storage(StorageError::Io(_))));
        assert_eq!(*journal.events.lock(), vec!["begin", "commit", "rollback"]);
        assert_eq!(uow.pending(), 1);
    }

    #[test]
    fn empty_commit_still_brackets() {
        let journal = Arc::new(Journal::default());
        let (mut uow, _) = setup(journal.clone(), None);

        let summary = uow.commit().unwrap();
        assert!(summary.is_empty());
        assert_eq!(*journal.events.lock(), vec!["begin", "commit"]);
    }

    #[test]
    fn registration_errors_skip_storage() {
        let journal = Arc::new(Journal::default());
        let (mut uow, _) = setup(journal.clone(), None);
        uow.register_removed(Item::post(1)).unwrap();

        assert!(uow.register_dirty(Item::post(1)).is_err());
        assert!(journal.events.lock().is_empty());
    }
}
