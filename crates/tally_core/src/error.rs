//! Error types for Tally core.

use crate::state::ObjectState;
use crate::types::{EntityId, EntityKey, EntityKind};
use thiserror::Error;

/// Result type for unit of work operations.
pub type UowResult<T> = Result<T, UowError>;

/// Errors that can occur while registering or committing changes.
#[derive(Debug, Error)]
pub enum UowError {
    /// `register_new` on an entity that already has a pending change.
    #[error("entity {key} is already registered as {state}")]
    AlreadyTracked {
        /// The entity that was registered twice.
        key: EntityKey,
        /// The state it is already tracked in.
        state: ObjectState,
    },

    /// `register_dirty` on an entity already marked for removal.
    #[error("entity {key} is already registered as removed")]
    AlreadyRemoved {
        /// The removed entity.
        key: EntityKey,
    },

    /// Detach of an entity the object store does not track.
    #[error("entity {key} is not tracked")]
    NotTracked {
        /// The untracked entity.
        key: EntityKey,
    },

    /// No data mapper is registered for an entity kind.
    #[error("no mapper registered for entity kind {kind}")]
    MapperNotRegistered {
        /// The kind without a mapper.
        kind: EntityKind,
    },

    /// A lookup found no persisted entity.
    #[error("no {kind} found with id {id}")]
    EntityNotFound {
        /// The kind searched.
        kind: EntityKind,
        /// The ID that was not found.
        id: EntityId,
    },

    /// A mapper was handed an entity of a kind it does not persist.
    #[error("mapper for {expected} received a {found} entity")]
    KindMismatch {
        /// The kind the mapper persists.
        expected: EntityKind,
        /// The kind it was given.
        found: EntityKind,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] tally_storage::StorageError),
}

impl UowError {
    /// Creates an already tracked error.
    pub fn already_tracked(key: EntityKey, state: ObjectState) -> Self {
        Self::AlreadyTracked { key, state }
    }

    /// Creates an already removed error.
    pub fn already_removed(key: EntityKey) -> Self {
        Self::AlreadyRemoved { key }
    }

    /// Creates a not tracked error.
    pub fn not_tracked(key: EntityKey) -> Self {
        Self::NotTracked { key }
    }

    /// Creates a mapper not registered error.
    pub fn mapper_not_registered(kind: EntityKind) -> Self {
        Self::MapperNotRegistered { kind }
    }

    /// Creates an entity not found error.
    pub fn entity_not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::EntityNotFound { kind, id }
    }

    /// Creates a kind mismatch error.
    pub fn kind_mismatch(expected: EntityKind, found: EntityKind) -> Self {
        Self::KindMismatch { expected, found }
    }
}
