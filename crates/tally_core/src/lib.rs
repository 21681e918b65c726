//! # Tally Core
//!
//! A change-tracking unit of work.
//!
//! Callers register the entities they touch as new, dirty, removed or
//! clean. On commit the unit of work walks the pending changes in
//! registration order and hands each entity to the data mapper registered
//! for its kind: `insert` for new entities, `update` for dirty ones,
//! `delete` for removed ones. Clean entities are left alone.
//!
//! This crate provides:
//! - [`EntityId`], [`EntityKind`], [`EntityKey`] and the [`Entity`] trait
//! - The registration state machine ([`transition`])
//! - The [`ObjectStore`] of pending changes
//! - [`DataMapper`] and the shared [`MapperRegistry`]
//! - [`BasicUnitOfWork`] and the storage-atomic [`TransactionalUnitOfWork`]
//!
//! ## Execution model
//!
//! A unit of work is meant to live for one logical request on one thread.
//! It does no internal locking around registrations or commit. The mapper
//! registry is the only piece meant to be shared between units of work.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod error;
mod mapper;
mod registry;
mod state;
mod store;
mod summary;
mod transactional;
mod types;
mod unit_of_work;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use entity::Entity;
pub use error::{UowError, UowResult};
pub use mapper::{DataMapper, MapperOp};
pub use registry::MapperRegistry;
pub use state::{transition, ObjectState, Registration, Transition, TransitionError};
pub use store::{ObjectStore, Tracked};
pub use summary::CommitSummary;
pub use transactional::TransactionalUnitOfWork;
pub use types::{EntityId, EntityKey, EntityKind};
pub use unit_of_work::{BasicUnitOfWork, UnitOfWork};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
