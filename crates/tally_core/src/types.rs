//! Core type definitions for Tally.

use std::fmt;

/// Caller-assigned integer identity of an entity.
///
/// Identities are stable and immutable once an entity is persisted.
/// [`EntityId::UNASSIGNED`] (zero) conventionally marks an entity that has
/// not been given an identity yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(pub i64);

impl EntityId {
    /// The "not yet persisted" identity.
    pub const UNASSIGNED: Self = Self(0);

    /// Creates a new entity ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Returns true unless this is [`EntityId::UNASSIGNED`].
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Tag naming the kind of an entity.
///
/// Kinds select the data mapper responsible for an entity. They are
/// declared once per entity type, usually as a constant:
///
/// ```rust
/// use tally_core::EntityKind;
///
/// const POST: EntityKind = EntityKind::new("post");
/// assert_eq!(POST.name(), "post");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKind(&'static str);

impl EntityKind {
    /// Creates a new entity kind.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the kind's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Tracking handle of an entity: its kind plus its identity.
///
/// The object store is keyed by `EntityKey`, never by the entity value, so
/// an entity's own equality has no say in how it is tracked. Entities of
/// different kinds may share an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    kind: EntityKind,
    id: EntityId,
}

impl EntityKey {
    /// Creates a new entity key.
    #[must_use]
    pub const fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Returns the entity kind.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        self.kind
    }

    /// Returns the entity ID.
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}
