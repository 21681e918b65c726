//! The unit of work: registration and commit dispatch.

use crate::config::Config;
use crate::entity::Entity;
use crate::error::UowResult;
use crate::mapper::MapperOp;
use crate::registry::MapperRegistry;
use crate::state::{transition, ObjectState, Registration, Transition};
use crate::store::ObjectStore;
use crate::summary::CommitSummary;
use crate::types::{EntityKey, EntityKind};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Batches changes to entities and flushes them in one commit.
///
/// Callers register every entity they touch with the state commit should
/// act on. Each `register_*` passes the entity by value; the unit of work
/// keeps the latest value registered and hands it to the entity's data
/// mapper at commit.
pub trait UnitOfWork<E: Entity> {
    /// Marks an entity for insertion.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::AlreadyTracked`](crate::UowError::AlreadyTracked)
    /// if the entity is already new, dirty or removed.
    fn register_new(&mut self, entity: E) -> UowResult<()>;

    /// Marks an entity for update.
    ///
    /// Has no effect on the state of an entity already new or dirty.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::AlreadyRemoved`](crate::UowError::AlreadyRemoved)
    /// if the entity is marked for removal.
    fn register_dirty(&mut self, entity: E) -> UowResult<()>;

    /// Marks an entity for deletion.
    ///
    /// A new entity is forgotten instead: it never reached storage, so there
    /// is nothing to delete.
    ///
    /// # Errors
    ///
    /// Never fails for a well-formed store; the `Result` covers internal
    /// invariant violations.
    fn register_removed(&mut self, entity: E) -> UowResult<()>;

    /// Marks an entity as matching storage.
    ///
    /// # Errors
    ///
    /// Never fails; kept fallible for symmetry with the other registrations.
    fn register_clean(&mut self, entity: E) -> UowResult<()>;

    /// Returns the tracking state of `key`, or `None` if untracked.
    fn state_of(&self, key: &EntityKey) -> Option<ObjectState>;

    /// Returns the number of tracked entities.
    fn pending(&self) -> usize;

    /// Sends every pending change to its mapper, then forgets them.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while resolving a mapper or running a
    /// mapper operation.
    fn commit(&mut self) -> UowResult<CommitSummary>;

    /// Forgets every pending change without touching storage.
    fn discard(&mut self);
}

/// A unit of work that dispatches straight to the mappers.
///
/// `BasicUnitOfWork` does not bracket the mapper calls with a storage
/// transaction; see [`TransactionalUnitOfWork`](crate::TransactionalUnitOfWork)
/// for that.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tally_core::{
///     BasicUnitOfWork, DataMapper, Entity, EntityId, EntityKind, MapperRegistry,
///     UnitOfWork, UowResult,
/// };
///
/// const NOTE: EntityKind = EntityKind::new("note");
///
/// #[derive(Debug, Clone)]
/// struct Note(i64);
///
/// impl Entity for Note {
///     fn kind(&self) -> EntityKind { NOTE }
///     fn id(&self) -> EntityId { EntityId::new(self.0) }
/// }
///
/// struct Printer;
/// impl DataMapper<Note> for Printer {
///     fn insert(&self, note: &Note) -> UowResult<()> { println!("insert {}", note.0); Ok(()) }
///     fn update(&self, note: &Note) -> UowResult<()> { println!("update {}", note.0); Ok(()) }
///     fn delete(&self, note: &Note) -> UowResult<()> { println!("delete {}", note.0); Ok(()) }
/// }
///
/// let registry: MapperRegistry<Note> = MapperRegistry::new().with_mapper(NOTE, Arc::new(Printer));
/// let mut uow = BasicUnitOfWork::new(Arc::new(registry));
///
/// uow.register_new(Note(1)).unwrap();
/// uow.register_removed(Note(2)).unwrap();
/// let summary = uow.commit().unwrap();
/// assert_eq!((summary.inserted, summary.deleted), (1, 1));
/// assert_eq!(uow.pending(), 0);
/// ```
#[derive(Debug)]
pub struct BasicUnitOfWork<E> {
    registry: Arc<MapperRegistry<E>>,
    store: ObjectStore<E>,
    config: Config,
}

impl<E: Entity> BasicUnitOfWork<E> {
    /// Creates a unit of work with default configuration.
    #[must_use]
    pub fn new(registry: Arc<MapperRegistry<E>>) -> Self {
        Self::with_config(registry, Config::default())
    }

    /// Creates a unit of work with the given configuration.
    #[must_use]
    pub fn with_config(registry: Arc<MapperRegistry<E>>, config: Config) -> Self {
        Self {
            registry,
            store: ObjectStore::new(),
            config,
        }
    }

    /// Returns the shared mapper registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<MapperRegistry<E>> {
        &self.registry
    }

    /// Returns the tracked changes.
    #[must_use]
    pub fn store(&self) -> &ObjectStore<E> {
        &self.store
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    fn register(&mut self, entity: E, registration: Registration) -> UowResult<()> {
        let key = entity.key();
        let current = self.store.state(&key);
        let change = transition(current, registration).map_err(|err| err.for_entity(key))?;

        match change {
            Transition::Attach(state) => self.store.attach(entity, state),
            Transition::Requeue(state) => {
                self.store.detach(&key)?;
                self.store.attach(entity, state);
            }
            Transition::Detach => {
                self.store.detach(&key)?;
            }
            Transition::Unchanged => {
                // Keep the state, take the newer value.
                if let Some(state) = current {
                    self.store.attach(entity, state);
                }
            }
        }

        debug!(
            %key,
            %registration,
            from = ?current,
            to = ?change.apply(current),
            "registered entity"
        );
        Ok(())
    }

    /// Runs every pending mapper operation in registration order.
    ///
    /// The store is left untouched; callers decide when to clear it.
    pub(crate) fn dispatch(&self) -> UowResult<CommitSummary> {
        if self.config.preflight_mappers {
            let mut seen: HashSet<EntityKind> = HashSet::new();
            for kind in self.store.iter().map(|t| t.key().kind()) {
                if seen.insert(kind) {
                    self.registry.get(kind)?;
                }
            }
        }

        let mut summary = CommitSummary::default();
        for tracked in self.store.iter() {
            let mapper = self.registry.get(tracked.key().kind())?;
            let Some(op) = MapperOp::for_state(tracked.state()) else {
                summary.skipped += 1;
                continue;
            };

            debug!(key = %tracked.key(), %op, "dispatching");
            op.apply(mapper.as_ref(), tracked.entity())?;
            summary.record(op);
        }
        Ok(summary)
    }

    /// Forgets tracked changes after a successful commit.
    pub(crate) fn finish(&mut self, summary: &CommitSummary) {
        self.store.clear();
        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            skipped = summary.skipped,
            "commit complete"
        );
    }

    /// Applies the failure policy after a commit error.
    pub(crate) fn abandon(&mut self) {
        if self.config.clear_on_failure {
            self.store.clear();
        }
    }
}

impl<E: Entity> UnitOfWork<E> for BasicUnitOfWork<E> {
    fn register_new(&mut self, entity: E) -> UowResult<()> {
        self.register(entity, Registration::New)
    }

    fn register_dirty(&mut self, entity: E) -> UowResult<()> {
        self.register(entity, Registration::Dirty)
    }

    fn register_removed(&mut self, entity: E) -> UowResult<()> {
        self.register(entity, Registration::Removed)
    }

    fn register_clean(&mut self, entity: E) -> UowResult<()> {
        self.register(entity, Registration::Clean)
    }

    fn state_of(&self, key: &EntityKey) -> Option<ObjectState> {
        self.store.state(key)
    }

    fn pending(&self) -> usize {
        self.store.len()
    }

    fn commit(&mut self) -> UowResult<CommitSummary> {
        match self.dispatch() {
            Ok(summary) => {
                self.finish(&summary);
                Ok(summary)
            }
            Err(err) => {
                warn!(error = %err, "commit failed");
                self.abandon();
                Err(err)
            }
        }
    }

    fn discard(&mut self) {
        debug!(pending = self.store.len(), "discarding tracked changes");
        self.store.clear();
    }
}
