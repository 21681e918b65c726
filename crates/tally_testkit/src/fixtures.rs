//! Ready-wired units of work over recording doubles.

use crate::backend::RecordingBackend;
use crate::entity::{Doc, CHILD, PARENT};
use crate::recording::{CallLog, RecordingMapper};
use std::sync::Arc;
use tally_core::{BasicUnitOfWork, Config, MapperRegistry, TransactionalUnitOfWork};

/// A registry with recording mappers for [`PARENT`] and [`CHILD`] docs,
/// one shared call log and a recording transaction backend.
///
/// Every unit of work handed out by the same harness shares the registry,
/// the log and the backend.
#[derive(Debug)]
pub struct Harness {
    /// Calls made by both mappers, in order.
    pub log: CallLog,
    /// Mapper for [`PARENT`] docs.
    pub parents: Arc<RecordingMapper>,
    /// Mapper for [`CHILD`] docs.
    pub children: Arc<RecordingMapper>,
    /// Registry holding both mappers.
    pub registry: Arc<MapperRegistry<Doc>>,
    /// Transaction backend for transactional units of work.
    pub backend: Arc<RecordingBackend>,
}

impl Harness {
    /// Creates a harness with both mappers registered.
    pub fn new() -> Self {
        let log = CallLog::new();
        let parents = Arc::new(RecordingMapper::new(PARENT, log.clone()));
        let children = Arc::new(RecordingMapper::new(CHILD, log.clone()));

        let registry = MapperRegistry::new();
        registry.register(PARENT, parents.clone());
        registry.register(CHILD, children.clone());

        Self {
            log,
            parents,
            children,
            registry: Arc::new(registry),
            backend: Arc::new(RecordingBackend::new()),
        }
    }

    /// Returns a unit of work that dispatches without a transaction.
    pub fn basic(&self) -> BasicUnitOfWork<Doc> {
        self.basic_with(Config::default())
    }

    /// Returns a non-transactional unit of work with `config`.
    pub fn basic_with(&self, config: Config) -> BasicUnitOfWork<Doc> {
        BasicUnitOfWork::with_config(Arc::clone(&self.registry), config)
    }

    /// Returns a unit of work bracketed by the recording backend.
    pub fn transactional(&self) -> TransactionalUnitOfWork<Doc, Arc<RecordingBackend>> {
        self.transactional_with(Config::default())
    }

    /// Returns a transactional unit of work with `config`.
    pub fn transactional_with(
        &self,
        config: Config,
    ) -> TransactionalUnitOfWork<Doc, Arc<RecordingBackend>> {
        TransactionalUnitOfWork::with_config(
            Arc::clone(&self.backend),
            Arc::clone(&self.registry),
            config,
        )
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
