//! Blog domain objects.

use serde::{Deserialize, Serialize};
use tally_core::{Entity, EntityId, EntityKind};

/// Kind of [`BlogEntity::Post`].
pub const POST_KIND: EntityKind = EntityKind::new("post");

/// Kind of [`BlogEntity::Comment`].
pub const COMMENT_KIND: EntityKind = EntityKind::new("comment");

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID.
    pub id: i64,
    /// Comment text.
    pub text: String,
    /// ID of the post the comment belongs to.
    pub post_id: i64,
}

impl Comment {
    /// Creates a comment.
    pub fn new(id: i64, text: impl Into<String>, post_id: i64) -> Self {
        Self {
            id,
            text: text.into(),
            post_id,
        }
    }
}

/// A blog post and the comments loaded with it.
///
/// `comments` is an in-memory aggregate. Only the title is stored in the
/// posts table; each comment is persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Comments attached to the post.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Creates a post without comments.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            comments: Vec::new(),
        }
    }

    /// Replaces the comments with `comments`.
    pub fn load_comments(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
    }

    /// Forgets every comment.
    pub fn drop_comments(&mut self) {
        self.comments.clear();
    }

    /// Appends a comment.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Removes the comment with ID `comment_id` and returns it.
    pub fn remove_comment(&mut self, comment_id: i64) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.remove(index))
    }
}

/// Every kind of entity the blog persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogEntity {
    /// A post.
    Post(Post),
    /// A comment.
    Comment(Comment),
}

impl BlogEntity {
    /// Returns the post, if this is one.
    pub fn as_post(&self) -> Option<&Post> {
        match self {
            Self::Post(post) => Some(post),
            Self::Comment(_) => None,
        }
    }

    /// Returns the comment, if this is one.
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment(comment) => Some(comment),
            Self::Post(_) => None,
        }
    }
}

impl Entity for BlogEntity {
    fn kind(&self) -> EntityKind {
        match self {
            Self::Post(_) => POST_KIND,
            Self::Comment(_) => COMMENT_KIND,
        }
    }

    fn id(&self) -> EntityId {
        match self {
            Self::Post(post) => EntityId::new(post.id),
            Self::Comment(comment) => EntityId::new(comment.id),
        }
    }
}

impl From<Post> for BlogEntity {
    fn from(post: Post) -> Self {
        Self::Post(post)
    }
}

impl From<Comment> for BlogEntity {
    fn from(comment: Comment) -> Self {
        Self::Comment(comment)
    }
}
