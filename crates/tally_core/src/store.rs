//! Object store: the table of pending changes.

use crate::entity::Entity;
use crate::error::{UowError, UowResult};
use crate::state::ObjectState;
use crate::types::EntityKey;
use std::collections::{BTreeMap, HashMap};

/// An entity held by the object store together with its state.
#[derive(Debug, Clone)]
pub struct Tracked<E> {
    key: EntityKey,
    state: ObjectState,
    entity: E,
}

impl<E> Tracked<E> {
    /// Returns the tracking key.
    #[must_use]
    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> ObjectState {
        self.state
    }

    /// Returns the latest registered value of the entity.
    #[must_use]
    pub fn entity(&self) -> &E {
        &self.entity
    }
}

/// Mapping from entity to lifecycle state, in registration order.
///
/// Iteration yields entities in the order they were first attached, so a
/// caller that registers a parent before its children has the parent
/// dispatched first. Overwriting the state of a tracked entity keeps its
/// position; detaching and re-attaching moves it to the end.
///
/// Each entry holds the latest value the entity was attached with. That
/// value is what the data mapper receives at commit.
#[derive(Debug, Clone)]
pub struct ObjectStore<E> {
    /// Registration slot -> entry. Slots only grow until `clear`.
    entries: BTreeMap<u64, Tracked<E>>,
    /// Key -> registration slot.
    slots: HashMap<EntityKey, u64>,
    next_slot: u64,
}

impl<E> Default for ObjectStore<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            slots: HashMap::new(),
            next_slot: 0,
        }
    }
}

impl<E: Entity> ObjectStore<E> {
    /// Creates an empty object store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state of `entity`, replacing any previous state and value.
    pub fn attach(&mut self, entity: E, state: ObjectState) {
        let key = entity.key();
        if let Some(tracked) = self
            .slots
            .get(&key)
            .and_then(|slot| self.entries.get_mut(slot))
        {
            tracked.state = state;
            tracked.entity = entity;
            return;
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.slots.insert(key, slot);
        self.entries.insert(slot, Tracked { key, state, entity });
    }

    /// Removes the entry for `key` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::NotTracked`] if the store has no entry for `key`.
    pub fn detach(&mut self, key: &EntityKey) -> UowResult<Tracked<E>> {
        self.slots
            .remove(key)
            .and_then(|slot| self.entries.remove(&slot))
            .ok_or_else(|| UowError::not_tracked(*key))
    }

    /// Returns the state of `key`, or `None` if untracked.
    #[must_use]
    pub fn state(&self, key: &EntityKey) -> Option<ObjectState> {
        self.get(key).map(Tracked::state)
    }

    /// Returns the entry for `key`.
    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<&Tracked<E>> {
        self.slots.get(key).and_then(|slot| self.entries.get(slot))
    }

    /// Returns true if `key` has an entry.
    #[must_use]
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns true if `key` is tracked as [`ObjectState::New`].
    #[must_use]
    pub fn is_new(&self, key: &EntityKey) -> bool {
        self.state(key) == Some(ObjectState::New)
    }

    /// Returns true if `key` is tracked as [`ObjectState::Dirty`].
    #[must_use]
    pub fn is_dirty(&self, key: &EntityKey) -> bool {
        self.state(key) == Some(ObjectState::Dirty)
    }

    /// Returns true if `key` is tracked as [`ObjectState::Removed`].
    #[must_use]
    pub fn is_removed(&self, key: &EntityKey) -> bool {
        self.state(key) == Some(ObjectState::Removed)
    }

    /// Returns true if `key` is tracked as [`ObjectState::Clean`].
    #[must_use]
    pub fn is_clean(&self, key: &EntityKey) -> bool {
        self.state(key) == Some(ObjectState::Clean)
    }

    /// Iterates over entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tracked<E>> {
        self.entries.values()
    }

    /// Returns the number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
        self.next_slot = 0;
    }
}
