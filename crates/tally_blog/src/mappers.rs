//! SQLite data mappers for posts and comments.
//!
//! Mappers write with explicit IDs: identities are issued by
//! [`IdGenerator`](crate::IdGenerator) before the entity is registered, so
//! the row must land under the ID the unit of work tracked it by.

use crate::domain::{BlogEntity, Comment, Post, COMMENT_KIND, POST_KIND};
use rusqlite::Row;
use tally_core::{DataMapper, Entity, EntityId, UowError, UowResult};
use tally_storage::{params, Database};
use tracing::{debug, info};

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post::new(row.get(0)?, row.get::<_, String>(1)?))
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment::new(row.get(0)?, row.get::<_, String>(1)?, row.get(2)?))
}

/// Persists the title of [`Post`]s in the `posts` table.
///
/// Comments held by a post are not written here; each comment is
/// registered and persisted on its own.
#[derive(Debug, Clone)]
pub struct PostMapper {
    db: Database,
}

impl PostMapper {
    /// Creates a mapper over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn post(entity: &BlogEntity) -> UowResult<&Post> {
        entity
            .as_post()
            .ok_or_else(|| UowError::kind_mismatch(POST_KIND, entity.kind()))
    }

    /// Loads the post with ID `id`, without comments.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::EntityNotFound`] if no such post exists.
    pub fn find_by_id(&self, id: i64) -> UowResult<Post> {
        let post = self
            .db
            .query_row(
                "SELECT id, title FROM posts WHERE id = ?1",
                params![id],
                post_from_row,
            )?
            .ok_or_else(|| UowError::entity_not_found(POST_KIND, EntityId::new(id)))?;
        debug!(id, "post loaded");
        Ok(post)
    }

    /// Returns every post ordered by ID, without comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_all(&self) -> UowResult<Vec<Post>> {
        let posts = self
            .db
            .query_map("SELECT id, title FROM posts ORDER BY id", (), post_from_row)?;
        Ok(posts)
    }

    /// Returns true if a post with ID `id` is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn exists(&self, id: i64) -> UowResult<bool> {
        let exists = self
            .db
            .exists("SELECT 1 FROM posts WHERE id = ?1", params![id])?;
        debug!(id, exists, "post existence checked");
        Ok(exists)
    }
}

impl DataMapper<BlogEntity> for PostMapper {
    fn insert(&self, entity: &BlogEntity) -> UowResult<()> {
        let post = Self::post(entity)?;
        self.db.execute(
            "INSERT INTO posts (id, title) VALUES (?1, ?2)",
            params![post.id, post.title],
        )?;
        info!(id = post.id, "post inserted");
        Ok(())
    }

    fn update(&self, entity: &BlogEntity) -> UowResult<()> {
        let post = Self::post(entity)?;
        let changed = self.db.execute(
            "UPDATE posts SET title = ?1 WHERE id = ?2",
            params![post.title, post.id],
        )?;
        if changed == 0 {
            return Err(UowError::entity_not_found(POST_KIND, entity.id()));
        }
        info!(id = post.id, "post updated");
        Ok(())
    }

    fn delete(&self, entity: &BlogEntity) -> UowResult<()> {
        let post = Self::post(entity)?;
        let changed = self
            .db
            .execute("DELETE FROM posts WHERE id = ?1", params![post.id])?;
        info!(id = post.id, rows = changed, "post deleted");
        Ok(())
    }
}

/// Persists [`Comment`]s in the `comments` table.
#[derive(Debug, Clone)]
pub struct CommentMapper {
    db: Database,
}

impl CommentMapper {
    /// Creates a mapper over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn comment(entity: &BlogEntity) -> UowResult<&Comment> {
        entity
            .as_comment()
            .ok_or_else(|| UowError::kind_mismatch(COMMENT_KIND, entity.kind()))
    }

    /// Loads the comment with ID `id`.
    ///
    /// # Errors
    ///
    /// Returns [`UowError::EntityNotFound`] if no such comment exists.
    pub fn find_by_id(&self, id: i64) -> UowResult<Comment> {
        self.db
            .query_row(
                "SELECT id, text, post_id FROM comments WHERE id = ?1",
                params![id],
                comment_from_row,
            )?
            .ok_or_else(|| UowError::entity_not_found(COMMENT_KIND, EntityId::new(id)))
    }

    /// Returns the comments of post `post_id` ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_post_id(&self, post_id: i64) -> UowResult<Vec<Comment>> {
        let comments = self.db.query_map(
            "SELECT id, text, post_id FROM comments WHERE post_id = ?1 ORDER BY id",
            params![post_id],
            comment_from_row,
        )?;
        debug!(post_id, count = comments.len(), "comments loaded");
        Ok(comments)
    }

    /// Returns true if a comment with ID `id` is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn exists(&self, id: i64) -> UowResult<bool> {
        let exists = self
            .db
            .exists("SELECT 1 FROM comments WHERE id = ?1", params![id])?;
        Ok(exists)
    }
}

impl DataMapper<BlogEntity> for CommentMapper {
    fn insert(&self, entity: &BlogEntity) -> UowResult<()> {
        let comment = Self::comment(entity)?;
        self.db.execute(
            "INSERT INTO comments (id, text, post_id) VALUES (?1, ?2, ?3)",
            params![comment.id, comment.text, comment.post_id],
        )?;
        info!(id = comment.id, post_id = comment.post_id, "comment inserted");
        Ok(())
    }

    fn update(&self, entity: &BlogEntity) -> UowResult<()> {
        let comment = Self::comment(entity)?;
        let changed = self.db.execute(
            "UPDATE comments SET text = ?1, post_id = ?2 WHERE id = ?3",
            params![comment.text, comment.post_id, comment.id],
        )?;
        if changed == 0 {
            return Err(UowError::entity_not_found(COMMENT_KIND, entity.id()));
        }
        info!(id = comment.id, "comment updated");
        Ok(())
    }

    fn delete(&self, entity: &BlogEntity) -> UowResult<()> {
        let comment = Self::comment(entity)?;
        let changed = self
            .db
            .execute("DELETE FROM comments WHERE id = ?1", params![comment.id])?;
        info!(id = comment.id, rows = changed, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        schema::install(&db).unwrap();
        db
    }

    #[test]
    fn post_insert_find_update_delete() {
        let mapper = PostMapper::new(db());
        let mut post = Post::new(4, "draft");

        mapper.insert(&post.clone().into()).unwrap();
        assert!(mapper.exists(4).unwrap());
        assert_eq!(mapper.find_by_id(4).unwrap().title, "draft");

        post.title = "final".to_string();
        mapper.update(&post.clone().into()).unwrap();
        assert_eq!(mapper.find_by_id(4).unwrap().title, "final");

        mapper.delete(&post.into()).unwrap();
        assert!(!mapper.exists(4).unwrap());
    }

    #[test]
    fn missing_post_is_not_found() {
        let mapper = PostMapper::new(db());
        assert!(matches!(
            mapper.find_by_id(1),
            Err(UowError::EntityNotFound { kind, .. }) if kind == POST_KIND
        ));
        assert!(matches!(
            mapper.update(&Post::new(1, "x").into()),
            Err(UowError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn deleting_missing_row_is_a_noop() {
        let mapper = CommentMapper::new(db());
        mapper.delete(&Comment::new(9, "gone", 1).into()).unwrap();
    }

    #[test]
    fn duplicate_insert_is_a_storage_error() {
        let mapper = PostMapper::new(db());
        mapper.insert(&Post::new(1, "a").into()).unwrap();
        assert!(matches!(
            mapper.insert(&Post::new(1, "b").into()),
            Err(UowError::Storage(_))
        ));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let posts = PostMapper::new(db());
        let comment: BlogEntity = Comment::new(1, "hi", 1).into();
        assert!(matches!(
            posts.insert(&comment),
            Err(UowError::KindMismatch { expected, found })
                if expected == POST_KIND && found == COMMENT_KIND
        ));
    }

    #[test]
    fn comments_by_post() {
        let db = db();
        let comments = CommentMapper::new(db.clone());
        comments.insert(&Comment::new(2, "b", 1).into()).unwrap();
        comments.insert(&Comment::new(1, "a", 1).into()).unwrap();
        comments.insert(&Comment::new(3, "c", 2).into()).unwrap();

        let found = comments.find_by_post_id(1).unwrap();
        assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(comments.find_by_id(3).unwrap().post_id, 2);
        assert!(comments.find_by_post_id(7).unwrap().is_empty());
    }

    #[test]
    fn find_all_is_ordered() {
        let posts = PostMapper::new(db());
        for id in [3, 1, 2] {
            posts.insert(&Post::new(id, format!("p{id}")).into()).unwrap();
        }
        let ids: Vec<_> = posts.find_all().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
