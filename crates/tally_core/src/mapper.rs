//! Data mapper contract.

use crate::error::UowResult;
use crate::state::ObjectState;
use std::fmt;

/// Persists entities of one kind.
///
/// The unit of work calls exactly one of these per pending entity per
/// commit, chosen by the entity's [`ObjectState`]. Mappers do not need to
/// guard against duplicate calls within one commit; the registration
/// rules already prevent them.
///
/// Read accessors (lookups by ID, existence checks) are not part of this
/// trait. They are type-specific and consumed by repositories, not by the
/// unit of work.
pub trait DataMapper<E>: Send + Sync {
    /// Writes a new entity to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the write.
    fn insert(&self, entity: &E) -> UowResult<()>;

    /// Writes the current state of an existing entity to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the write.
    fn update(&self, entity: &E) -> UowResult<()>;

    /// Deletes an entity from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the delete.
    fn delete(&self, entity: &E) -> UowResult<()>;
}

/// The mapper operation a lifecycle state is committed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapperOp {
    /// [`DataMapper::insert`]
    Insert,
    /// [`DataMapper::update`]
    Update,
    /// [`DataMapper::delete`]
    Delete,
}

impl MapperOp {
    /// Returns the operation for `state`, or `None` for clean entities.
    #[must_use]
    pub const fn for_state(state: ObjectState) -> Option<Self> {
        match state {
            ObjectState::Clean => None,
            ObjectState::New => Some(Self::Insert),
            ObjectState::Dirty => Some(Self::Update),
            ObjectState::Removed => Some(Self::Delete),
        }
    }

    /// Runs this operation against `mapper`.
    ///
    /// # Errors
    ///
    /// Propagates the mapper's error unchanged.
    pub fn apply<E>(self, mapper: &dyn DataMapper<E>, entity: &E) -> UowResult<()> {
        match self {
            Self::Insert => mapper.insert(entity),
            Self::Update => mapper.update(entity),
            Self::Delete => mapper.delete(entity),
        }
    }
}

impl fmt::Display for MapperOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_for_each_state() {
        assert_eq!(MapperOp::for_state(ObjectState::Clean), None);
        assert_eq!(MapperOp::for_state(ObjectState::New), Some(MapperOp::Insert));
        assert_eq!(MapperOp::for_state(ObjectState::Dirty), Some(MapperOp::Update));
        assert_eq!(
            MapperOp::for_state(ObjectState::Removed),
            Some(MapperOp::Delete)
        );
    }
}
