//! Error types for the blog layer.

use tally_core::UowError;
use tally_storage::StorageError;
use thiserror::Error;

/// Result type for blog operations.
pub type BlogResult<T> = Result<T, BlogError>;

/// Errors that can occur in a blog use case.
#[derive(Debug, Error)]
pub enum BlogError {
    /// A post title was empty or blank.
    #[error("post title must not be empty")]
    EmptyTitle,

    /// A comment text was empty or blank.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// Registration, mapping or commit failed.
    #[error(transparent)]
    Uow(#[from] UowError),

    /// Opening the database or installing the schema failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BlogError {
    /// Returns true if the error reports a missing post or comment.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Uow(UowError::EntityNotFound { .. }))
    }
}
