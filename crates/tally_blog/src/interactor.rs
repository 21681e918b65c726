//! Use cases. Each interactor performs one change and commits once.

use crate::domain::{BlogEntity, Comment, Post};
use crate::error::{BlogError, BlogResult};
use crate::id_generator::IdGenerator;
use crate::repository::PostRepository;
use serde::Serialize;
use std::sync::Arc;
use tally_core::{CommitSummary, UnitOfWork};
use tracing::info;

/// Creates a post.
#[derive(Debug)]
pub struct CreatePost<U> {
    uow: U,
    repository: PostRepository,
    ids: Arc<IdGenerator>,
}

impl<U: UnitOfWork<BlogEntity>> CreatePost<U> {
    /// Creates the use case over a fresh unit of work.
    pub fn new(uow: U, repository: PostRepository, ids: Arc<IdGenerator>) -> Self {
        Self {
            uow,
            repository,
            ids,
        }
    }

    /// Persists a new post titled `title` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::EmptyTitle`] for a blank title, or the first
    /// registration or commit error.
    pub fn execute(mut self, title: &str) -> BlogResult<Post> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BlogError::EmptyTitle);
        }

        let post = Post::new(self.ids.next_post_id()?, title);
        self.repository.save_post(&mut self.uow, &post)?;
        self.uow.commit()?;

        info!(id = post.id, "post created");
        Ok(post)
    }
}

/// Adds a comment to an existing post.
#[derive(Debug)]
pub struct CreateComment<U> {
    uow: U,
    repository: PostRepository,
    ids: Arc<IdGenerator>,
}

impl<U: UnitOfWork<BlogEntity>> CreateComment<U> {
    /// Creates the use case over a fresh unit of work.
    pub fn new(uow: U, repository: PostRepository, ids: Arc<IdGenerator>) -> Self {
        Self {
            uow,
            repository,
            ids,
        }
    }

    /// Persists a new comment on post `post_id` and returns it.
    ///
    /// The post itself is saved too, so its row is updated in the same
    /// transaction as the comment is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::EmptyComment`] for a blank text, a not-found
    /// error if the post does not exist, or the first registration or
    /// commit error.
    pub fn execute(mut self, post_id: i64, text: &str) -> BlogResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BlogError::EmptyComment);
        }

        let mut post = self.repository.load_post(&mut self.uow, post_id)?;
        let comment = Comment::new(self.ids.next_comment_id()?, text, post_id);
        post.add_comment(comment.clone());

        self.repository.save_post(&mut self.uow, &post)?;
        self.uow.commit()?;

        info!(id = comment.id, post_id, "comment created");
        Ok(comment)
    }
}

/// Outcome of [`DeletePost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedPost {
    /// ID of the deleted post.
    pub post_id: i64,
    /// Number of comments deleted with it.
    pub comments: usize,
}

/// Deletes a post and its comments.
#[derive(Debug)]
pub struct DeletePost<U> {
    uow: U,
    repository: PostRepository,
}

impl<U: UnitOfWork<BlogEntity>> DeletePost<U> {
    /// Creates the use case over a fresh unit of work.
    pub fn new(uow: U, repository: PostRepository) -> Self {
        Self { uow, repository }
    }

    /// Deletes post `post_id` together with every comment on it.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the post does not exist, or the first
    /// registration or commit error.
    pub fn execute(mut self, post_id: i64) -> BlogResult<DeletedPost> {
        let mut post = self.repository.load_post(&mut self.uow, post_id)?;
        self.repository.delete_post(&mut self.uow, &mut post)?;
        let summary: CommitSummary = self.uow.commit()?;

        // One delete is the post itself.
        let comments = summary.deleted.saturating_sub(1);
        info!(post_id, comments, "post deleted");
        Ok(DeletedPost { post_id, comments })
    }
}
