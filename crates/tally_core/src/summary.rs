//! Commit outcome counters.

use crate::mapper::MapperOp;
use std::fmt;

/// What a successful commit did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of `insert` calls.
    pub inserted: usize,
    /// Number of `update` calls.
    pub updated: usize,
    /// Number of `delete` calls.
    pub deleted: usize,
    /// Number of clean entities that needed no call.
    pub skipped: usize,
}

impl CommitSummary {
    /// Returns the number of mapper calls made.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    /// Returns true if the commit made no mapper call.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub(crate) fn record(&mut self, op: MapperOp) {
        match op {
            MapperOp::Insert => self.inserted += 1,
            MapperOp::Update => self.updated += 1,
            MapperOp::Delete => self.deleted += 1,
        }
    }
}

impl fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} deleted",
            self.inserted, self.updated, self.deleted
        )
    }
}
