//! # Tally Testkit
//!
//! Test utilities for Tally.
//!
//! This crate provides:
//! - [`Doc`], a minimal entity with a configurable kind
//! - [`RecordingMapper`], a data mapper that logs every call and can be
//!   told to fail
//! - [`RecordingBackend`], a transaction backend that logs
//!   `BEGIN` / `COMMIT` / `ROLLBACK` and can be told to refuse them
//! - [`Harness`], wiring the above into ready-to-use units of work
//! - proptest strategies for registration scripts
//!
//! ## Usage
//!
//! ```rust
//! use tally_core::{MapperOp, UnitOfWork};
//! use tally_testkit::prelude::*;
//!
//! let harness = Harness::new();
//! let mut uow = harness.transactional();
//! uow.register_new(Doc::parent(1)).unwrap();
//! uow.commit().unwrap();
//!
//! assert_eq!(harness.log.count(MapperOp::Insert), 1);
//! assert_eq!(harness.backend.events(), vec![TxEvent::Begin, TxEvent::Commit]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod entity;
pub mod fixtures;
pub mod generators;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::*;
    pub use crate::entity::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::recording::*;
}

pub use backend::{RecordingBackend, TxEvent};
pub use entity::{Doc, CHILD, PARENT};
pub use fixtures::Harness;
pub use recording::{CallLog, MapperCall, RecordingMapper};
