//! Application wiring over one database.

use crate::domain::{BlogEntity, Comment, Post, COMMENT_KIND, POST_KIND};
use crate::error::BlogResult;
use crate::id_generator::IdGenerator;
use crate::interactor::{CreateComment, CreatePost, DeletePost, DeletedPost};
use crate::mappers::{CommentMapper, PostMapper};
use crate::repository::PostRepository;
use crate::schema;
use std::path::Path;
use std::sync::Arc;
use tally_core::{Config, MapperRegistry, TransactionalUnitOfWork};
use tally_storage::Database;
use tracing::info;

/// The unit of work every blog use case runs in.
pub type BlogUnitOfWork = TransactionalUnitOfWork<BlogEntity, Database>;

/// Everything a blog use case needs, built once per database.
///
/// The mapper registry, repository and ID generator are shared. Each use
/// case gets its own unit of work from [`unit_of_work`](Self::unit_of_work).
#[derive(Debug, Clone)]
pub struct BlogContext {
    db: Database,
    registry: Arc<MapperRegistry<BlogEntity>>,
    repository: PostRepository,
    ids: Arc<IdGenerator>,
    config: Config,
}

impl BlogContext {
    /// Opens (or creates) the database at `path` and installs the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema fails.
    pub fn open(path: &Path) -> BlogResult<Self> {
        let db = Database::open_with_create_dirs(path)?;
        info!(path = %path.display(), "blog database opened");
        Self::with_database(db)
    }

    /// Opens a private in-memory database with the schema installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema fails.
    pub fn open_in_memory() -> BlogResult<Self> {
        Self::with_database(Database::open_in_memory()?)
    }

    /// Wires the blog over an already open database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema fails.
    pub fn with_database(db: Database) -> BlogResult<Self> {
        schema::install(&db)?;

        let posts = Arc::new(PostMapper::new(db.clone()));
        let comments = Arc::new(CommentMapper::new(db.clone()));

        let registry: MapperRegistry<BlogEntity> = MapperRegistry::new()
            .with_mapper(POST_KIND, posts.clone())
            .with_mapper(COMMENT_KIND, comments.clone());

        Ok(Self {
            ids: Arc::new(IdGenerator::new(db.clone())),
            repository: PostRepository::new(posts, comments),
            registry: Arc::new(registry),
            config: Config::default(),
            db,
        })
    }

    /// Sets the configuration of every unit of work handed out later.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns the shared mapper registry.
    pub fn registry(&self) -> &Arc<MapperRegistry<BlogEntity>> {
        &self.registry
    }

    /// Returns the post repository.
    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    /// Returns a fresh unit of work bracketed by a database transaction.
    pub fn unit_of_work(&self) -> BlogUnitOfWork {
        TransactionalUnitOfWork::with_config(
            self.db.clone(),
            Arc::clone(&self.registry),
            self.config,
        )
    }

    /// Runs [`CreatePost`].
    ///
    /// # Errors
    ///
    /// See [`CreatePost::execute`].
    pub fn create_post(&self, title: &str) -> BlogResult<Post> {
        CreatePost::new(
            self.unit_of_work(),
            self.repository.clone(),
            Arc::clone(&self.ids),
        )
        .execute(title)
    }

    /// Runs [`CreateComment`].
    ///
    /// # Errors
    ///
    /// See [`CreateComment::execute`].
    pub fn add_comment(&self, post_id: i64, text: &str) -> BlogResult<Comment> {
        CreateComment::new(
            self.unit_of_work(),
            self.repository.clone(),
            Arc::clone(&self.ids),
        )
        .execute(post_id, text)
    }

    /// Runs [`DeletePost`].
    ///
    /// # Errors
    ///
    /// See [`DeletePost::execute`].
    pub fn delete_post(&self, post_id: i64) -> BlogResult<DeletedPost> {
        DeletePost::new(self.unit_of_work(), self.repository.clone()).execute(post_id)
    }

    /// Reads post `post_id` with its comments.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the post does not exist.
    pub fn find_post(&self, post_id: i64) -> BlogResult<Post> {
        Ok(self.repository.find_post(post_id)?)
    }

    /// Reads every post with its comments.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_posts(&self) -> BlogResult<Vec<Post>> {
        Ok(self.repository.list_posts()?)
    }
}
