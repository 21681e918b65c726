//! Mapper registry: entity kind to data mapper.

use crate::error::{UowError, UowResult};
use crate::mapper::DataMapper;
use crate::types::EntityKind;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Lookup table from entity kind to the mapper that persists it.
///
/// A registry is built once at startup and shared, usually as an
/// `Arc<MapperRegistry<E>>`, by every unit of work of the application.
/// Lookups match the kind exactly. Registration is last-write-wins.
///
/// The table sits behind a lock so maintenance calls
/// ([`register`](Self::register), [`unregister`](Self::unregister)) work
/// through a shared reference.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tally_core::{DataMapper, EntityKind, MapperRegistry, UowResult};
///
/// struct Noop;
/// impl DataMapper<String> for Noop {
///     fn insert(&self, _: &String) -> UowResult<()> { Ok(()) }
///     fn update(&self, _: &String) -> UowResult<()> { Ok(()) }
///     fn delete(&self, _: &String) -> UowResult<()> { Ok(()) }
/// }
///
/// const NOTE: EntityKind = EntityKind::new("note");
///
/// let registry: MapperRegistry<String> = MapperRegistry::new().with_mapper(NOTE, Arc::new(Noop));
/// assert!(registry.get(NOTE).is_ok());
/// assert!(registry.get(EntityKind::new("tag")).is_err());
/// ```
pub struct MapperRegistry<E> {
    mappers: RwLock<HashMap<EntityKind, Arc<dyn DataMapper<E>>>>,
}

impl<E> Default for MapperRegistry<E> {
    fn default() -> Self {
        Self {
            mappers: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> MapperRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `mapper` for `kind` and returns the registry.
    #[must_use]
    pub fn with_mapper(self, kind: EntityKind, mapper: Arc<dyn DataMapper<E>>) -> Self {
        self.register(kind, mapper);
        self
    }

    /// Associates `mapper` with `kind`, replacing any previous mapper.
    pub fn register(&self, kind: EntityKind, mapper: Arc<dyn DataMapper<E>>) {
        let replaced = self.mappers.write().insert(kind, mapper).is_some();
        debug!(%kind, replaced, "registered mapper");
    }

    /// Returns the mapper for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::MapperNotRegistered`] if no mapper is registered.
    pub fn get(&self, kind: EntityKind) -> UowResult<Arc<dyn DataMapper<E>>> {
        self.mappers
            .read()
            .get(&kind)
            .cloned()
            .ok_or_else(|| UowError::mapper_not_registered(kind))
    }

    /// Removes and returns the mapper for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::MapperNotRegistered`] if no mapper is registered.
    pub fn unregister(&self, kind: EntityKind) -> UowResult<Arc<dyn DataMapper<E>>> {
        let mapper = self
            .mappers
            .write()
            .remove(&kind)
            .ok_or_else(|| UowError::mapper_not_registered(kind))?;
        debug!(%kind, "unregistered mapper");
        Ok(mapper)
    }

    /// Returns true if a mapper is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: EntityKind) -> bool {
        self.mappers.read().contains_key(&kind)
    }

    /// Returns the registered kinds, sorted by name.
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<_> = self.mappers.read().keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Returns the number of registered mappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.read().len()
    }

    /// Returns true if no mapper is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.read().is_empty()
    }
}

impl<E> fmt::Debug for MapperRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
