//! A minimal entity for tests.

use tally_core::{Entity, EntityId, EntityKind};

/// Kind used for parent-like test entities.
pub const PARENT: EntityKind = EntityKind::new("parent");

/// Kind used for child-like test entities.
pub const CHILD: EntityKind = EntityKind::new("child");

/// A test entity: a kind, an ID and a free-form body.
///
/// The body lets tests check which value a mapper received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    /// The entity kind.
    pub kind: EntityKind,
    /// The entity ID.
    pub id: EntityId,
    /// Arbitrary payload.
    pub body: String,
}

impl Doc {
    /// Creates a doc with an empty body.
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self {
            kind,
            id: EntityId::new(id),
            body: String::new(),
        }
    }

    /// Creates a [`PARENT`] doc.
    pub fn parent(id: i64) -> Self {
        Self::new(PARENT, id)
    }

    /// Creates a [`CHILD`] doc.
    pub fn child(id: i64) -> Self {
        Self::new(CHILD, id)
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl Entity for Doc {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn id(&self) -> EntityId {
        self.id
    }
}
