//! The entity contract.

use crate::types::{EntityId, EntityKey, EntityKind};
use std::fmt;

/// A domain object the unit of work can track.
///
/// Entities are plain data holders. Tracking only looks at
/// [`key`](Self::key); the entity's own `PartialEq`/`Hash`, if any, are
/// never consulted.
///
/// An application usually models the closed set of kinds it persists as
/// one enum and implements `Entity` for that enum:
///
/// ```rust
/// use tally_core::{Entity, EntityId, EntityKind};
///
/// #[derive(Debug, Clone)]
/// struct Tag { id: EntityId, label: String }
///
/// #[derive(Debug, Clone)]
/// enum Record { Tag(Tag) }
///
/// impl Entity for Record {
///     fn kind(&self) -> EntityKind {
///         match self { Record::Tag(_) => EntityKind::new("tag") }
///     }
///     fn id(&self) -> EntityId {
///         match self { Record::Tag(tag) => tag.id }
///     }
/// }
/// ```
pub trait Entity: Clone + fmt::Debug {
    /// Returns the kind used to pick this entity's data mapper.
    fn kind(&self) -> EntityKind;

    /// Returns the entity's identity.
    fn id(&self) -> EntityId;

    /// Returns the tracking handle for this entity.
    fn key(&self) -> EntityKey {
        EntityKey::new(self.kind(), self.id())
    }
}
