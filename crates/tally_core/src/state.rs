//! Lifecycle states and the registration state machine.
//!
//! [`transition`] is a pure function from the current tracking state of an
//! entity and a requested registration to the change the object store must
//! make. It carries every registration rule, so the rules can be tested
//! without a store, a mapper or a database.
//!
//! | Registration | Current            | Outcome                          |
//! |--------------|--------------------|----------------------------------|
//! | new          | untracked, clean   | attach NEW                       |
//! | new          | new, dirty, removed| `AlreadyTracked`                 |
//! | dirty        | untracked, clean   | attach DIRTY                     |
//! | dirty        | new, dirty         | unchanged                        |
//! | dirty        | removed            | `AlreadyRemoved`                 |
//! | removed      | new                | detach (the insert is cancelled) |
//! | removed      | dirty              | detach, then attach REMOVED      |
//! | removed      | untracked, clean   | attach REMOVED                   |
//! | removed      | removed            | unchanged                        |
//! | clean        | any                | attach CLEAN                     |

use crate::error::UowError;
use crate::types::EntityKey;
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a tracked entity.
///
/// An entity with no entry in the object store is untracked; this is
/// represented as `Option::<ObjectState>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectState {
    /// Believed to match storage; skipped at commit.
    Clean,
    /// Inserted at commit.
    New,
    /// Updated at commit.
    Dirty,
    /// Deleted at commit.
    Removed,
}

impl ObjectState {
    /// Returns true if commit issues a mapper call for this state.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Clean)
    }
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::New => "new",
            Self::Dirty => "dirty",
            Self::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// A registration requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registration {
    /// `register_new`
    New,
    /// `register_dirty`
    Dirty,
    /// `register_removed`
    Removed,
    /// `register_clean`
    Clean,
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Dirty => "dirty",
            Self::Removed => "removed",
            Self::Clean => "clean",
        };
        f.write_str(name)
    }
}

/// The change a registration makes to the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Set the state. An entity already tracked keeps its position.
    Attach(ObjectState),
    /// Detach, then attach with the given state at the end of the order.
    Requeue(ObjectState),
    /// Drop the entry entirely.
    Detach,
    /// Leave the state as it is.
    Unchanged,
}

impl Transition {
    /// Returns the tracking state after applying this transition to `current`.
    #[must_use]
    pub const fn apply(self, current: Option<ObjectState>) -> Option<ObjectState> {
        match self {
            Self::Attach(state) | Self::Requeue(state) => Some(state),
            Self::Detach => None,
            Self::Unchanged => current,
        }
    }
}

/// A registration the state machine refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The entity already has a pending change.
    #[error("already registered as {0}")]
    AlreadyTracked(ObjectState),
    /// The entity is already marked for removal.
    #[error("already registered as removed")]
    AlreadyRemoved,
}

impl TransitionError {
    /// Attaches the offending entity to produce a [`UowError`].
    #[must_use]
    pub fn for_entity(self, key: EntityKey) -> UowError {
        match self {
            Self::AlreadyTracked(state) => UowError::already_tracked(key, state),
            Self::AlreadyRemoved => UowError::already_removed(key),
        }
    }
}

/// Decides what a registration does to an entity in state `current`.
///
/// # Errors
///
/// - [`TransitionError::AlreadyTracked`] for `New` on a new, dirty or removed entity
/// - [`TransitionError::AlreadyRemoved`] for `Dirty` on a removed entity
pub const fn transition(
    current: Option<ObjectState>,
    registration: Registration,
) -> Result<Transition, TransitionError> {
    use ObjectState as S;

    match registration {
        Registration::New => match current {
            None | Some(S::Clean) => Ok(Transition::Attach(S::New)),
            Some(state) => Err(TransitionError::AlreadyTracked(state)),
        },
        Registration::Dirty => match current {
            None | Some(S::Clean) => Ok(Transition::Attach(S::Dirty)),
            Some(S::New | S::Dirty) => Ok(Transition::Unchanged),
            Some(S::Removed) => Err(TransitionError::AlreadyRemoved),
        },
        Registration::Removed => match current {
            Some(S::New) => Ok(Transition::Detach),
            Some(S::Dirty) => Ok(Transition::Requeue(S::Removed)),
            None | Some(S::Clean) => Ok(Transition::Attach(S::Removed)),
            Some(S::Removed) => Ok(Transition::Unchanged),
        },
        Registration::Clean => Ok(Transition::Attach(S::Clean)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ObjectState::{Clean, Dirty, New, Removed};

    const ALL: [Option<ObjectState>; 5] = [None, Some(Clean), Some(New), Some(Dirty), Some(Removed)];

    #[test]
    fn new_only_from_untracked_or_clean() {
        assert_eq!(transition(None, Registration::New), Ok(Transition::Attach(New)));
        assert_eq!(
            transition(Some(Clean), Registration::New),
            Ok(Transition::Attach(New))
        );
        for state in [New, Dirty, Removed] {
            assert_eq!(
                transition(Some(state), Registration::New),
                Err(TransitionError::AlreadyTracked(state))
            );
        }
    }

    #[test]
    fn dirty_is_noop_for_pending_writes() {
        assert_eq!(
            transition(None, Registration::Dirty),
            Ok(Transition::Attach(Dirty))
        );
        assert_eq!(
            transition(Some(Clean), Registration::Dirty),
            Ok(Transition::Attach(Dirty))
        );
        assert_eq!(
            transition(Some(New), Registration::Dirty),
            Ok(Transition::Unchanged)
        );
        assert_eq!(
            transition(Some(Dirty), Registration::Dirty),
            Ok(Transition::Unchanged)
        );
        assert_eq!(
            transition(Some(Removed), Registration::Dirty),
            Err(TransitionError::AlreadyRemoved)
        );
    }

    #[test]
    fn removing_new_cancels_insert() {
        let t = transition(Some(New), Registration::Removed).unwrap();
        assert_eq!(t, Transition::Detach);
        assert_eq!(t.apply(Some(New)), None);
    }

    #[test]
    fn removing_dirty_requeues_as_removed() {
        let t = transition(Some(Dirty), Registration::Removed).unwrap();
        assert_eq!(t, Transition::Requeue(Removed));
        assert_eq!(t.apply(Some(Dirty)), Some(Removed));
    }

    #[test]
    fn removed_is_idempotent() {
        assert_eq!(
            transition(None, Registration::Removed),
            Ok(Transition::Attach(Removed))
        );
        assert_eq!(
            transition(Some(Clean), Registration::Removed),
            Ok(Transition::Attach(Removed))
        );
        assert_eq!(
            transition(Some(Removed), Registration::Removed),
            Ok(Transition::Unchanged)
        );
    }

    #[test]
    fn clean_always_overwrites() {
        for current in ALL {
            let t = transition(current, Registration::Clean).unwrap();
            assert_eq!(t.apply(current), Some(Clean));
        }
    }

    #[test]
    fn removal_never_errors() {
        for current in ALL {
            assert!(transition(current, Registration::Removed).is_ok());
        }
    }

    #[test]
    fn only_clean_is_not_pending() {
        assert!(!Clean.is_pending());
        assert!(New.is_pending());
        assert!(Dirty.is_pending());
        assert!(Removed.is_pending());
    }

    #[test]
    fn error_carries_key() {
        use crate::types::{EntityId, EntityKind};

        let key = EntityKey::new(EntityKind::new("post"), EntityId::new(1));
        let err = TransitionError::AlreadyTracked(Dirty).for_entity(key);
        assert_eq!(err.to_string(), "entity post#1 is already registered as dirty");
    }
}
