//! # Tally Blog
//!
//! Posts and comments persisted through the Tally unit of work.
//!
//! The crate is a small but complete application layer:
//!
//! - [`Post`] and [`Comment`], wrapped in the [`BlogEntity`] tagged union
//! - SQLite data mappers ([`PostMapper`], [`CommentMapper`]) and the schema
//!   they expect
//! - [`PostRepository`], which turns domain operations into registrations
//! - the [`CreatePost`], [`CreateComment`] and [`DeletePost`] interactors,
//!   each committing exactly once
//! - [`BlogContext`], which wires all of the above over one database
//!
//! ## Example
//!
//! ```rust
//! use tally_blog::BlogContext;
//!
//! let blog = BlogContext::open_in_memory().unwrap();
//! let post = blog.create_post("Hello").unwrap();
//! blog.add_comment(post.id, "First!").unwrap();
//!
//! let loaded = blog.find_post(post.id).unwrap();
//! assert_eq!(loaded.comments.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod domain;
mod error;
mod id_generator;
mod interactor;
mod mappers;
mod repository;
pub mod schema;

pub use context::{BlogContext, BlogUnitOfWork};
pub use domain::{BlogEntity, Comment, Post, COMMENT_KIND, POST_KIND};
pub use error::{BlogError, BlogResult};
pub use id_generator::IdGenerator;
pub use interactor::{CreateComment, CreatePost, DeletePost, DeletedPost};
pub use mappers::{CommentMapper, PostMapper};
pub use repository::PostRepository;
