//! Post repository: domain operations expressed as registrations.

use crate::domain::{BlogEntity, Post};
use crate::mappers::{CommentMapper, PostMapper};
use std::sync::Arc;
use tally_core::{UnitOfWork, UowResult};
use tracing::info;

/// Loads posts and records what should happen to them in a unit of work.
///
/// The repository never writes. Saving or deleting a post only registers
/// the post and its comments; the write happens when the caller commits.
#[derive(Debug, Clone)]
pub struct PostRepository {
    posts: Arc<PostMapper>,
    comments: Arc<CommentMapper>,
}

impl PostRepository {
    /// Creates a repository over the given mappers.
    pub fn new(posts: Arc<PostMapper>, comments: Arc<CommentMapper>) -> Self {
        Self { posts, comments }
    }

    /// Reads post `id` with its comments, without tracking them.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::EntityNotFound`](tally_core::UowError::EntityNotFound)
    /// if the post does not exist.
    pub fn find_post(&self, id: i64) -> UowResult<Post> {
        let mut post = self.posts.find_by_id(id)?;
        post.load_comments(self.comments.find_by_post_id(id)?);
        Ok(post)
    }

    /// Reads post `id` with its comments and registers all of them clean.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::EntityNotFound`](tally_core::UowError::EntityNotFound)
    /// if the post does not exist.
    pub fn load_post<U>(&self, uow: &mut U, id: i64) -> UowResult<Post>
    where
        U: UnitOfWork<BlogEntity>,
    {
        let post = self.find_post(id)?;
        uow.register_clean(post.clone().into())?;
        for comment in &post.comments {
            uow.register_clean(comment.clone().into())?;
        }
        info!(id, comments = post.comments.len(), "post loaded");
        Ok(post)
    }

    /// Registers `post` as dirty if it is persisted and new otherwise, and
    /// each of its comments that is not persisted yet as new.
    ///
    /// # Errors
    ///
    /// Returns an error if an existence check or a registration fails.
    pub fn save_post<U>(&self, uow: &mut U, post: &Post) -> UowResult<()>
    where
        U: UnitOfWork<BlogEntity>,
    {
        if self.posts.exists(post.id)? {
            uow.register_dirty(post.clone().into())?;
            info!(id = post.id, "post registered dirty");
        } else {
            uow.register_new(post.clone().into())?;
            info!(id = post.id, "post registered new");
        }

        for comment in &post.comments {
            if !self.comments.exists(comment.id)? {
                uow.register_new(comment.clone().into())?;
                info!(id = comment.id, post_id = post.id, "comment registered new");
            }
        }
        Ok(())
    }

    /// Registers `post` and every comment it holds as removed, then drops
    /// the comments from `post`.
    ///
    /// # Errors
    ///
    /// Returns an error if a registration fails.
    pub fn delete_post<U>(&self, uow: &mut U, post: &mut Post) -> UowResult<()>
    where
        U: UnitOfWork<BlogEntity>,
    {
        uow.register_removed(post.clone().into())?;
        for comment in &post.comments {
            uow.register_removed(comment.clone().into())?;
        }
        info!(id = post.id, comments = post.comments.len(), "post registered removed");
        post.drop_comments();
        Ok(())
    }

    /// Returns every post with its comments, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_posts(&self) -> UowResult<Vec<Post>> {
        let mut posts = self.posts.find_all()?;
        for post in &mut posts {
            post.load_comments(self.comments.find_by_post_id(post.id)?);
        }
        Ok(posts)
    }
}
