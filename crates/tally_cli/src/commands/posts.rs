//! Post command implementations.

use super::{open, CommandResult};
use serde::Serialize;
use std::path::Path;
use tally_blog::Post;

/// Post listing for JSON output.
#[derive(Debug, Serialize)]
pub struct PostList<'a> {
    /// Number of posts.
    pub count: usize,
    /// The posts, ordered by ID.
    pub posts: &'a [Post],
}

/// Runs the create-post command.
pub fn create(path: &Path, title: &str) -> CommandResult {
    let blog = open(path)?;
    let post = blog.create_post(title)?;
    println!("Created post {}", post.id);
    Ok(())
}

/// Runs the delete-post command.
pub fn delete(path: &Path, post_id: i64) -> CommandResult {
    let blog = open(path)?;
    let deleted = blog.delete_post(post_id)?;
    println!(
        "Deleted post {} and {} comment(s)",
        deleted.post_id, deleted.comments
    );
    Ok(())
}

/// Runs the show-post command.
pub fn show(path: &Path, post_id: i64, format: &str) -> CommandResult {
    let blog = open(path)?;
    let post = blog.find_post(post_id)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&post)?),
        _ => print_post(&post),
    }
    Ok(())
}

/// Runs the list-posts command.
pub fn list(path: &Path, format: &str) -> CommandResult {
    let blog = open(path)?;
    let posts = blog.list_posts()?;

    match format {
        "json" => {
            let list = PostList {
                count: posts.len(),
                posts: &posts,
            };
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        _ => {
            if posts.is_empty() {
                println!("No posts");
            }
            for post in &posts {
                println!(
                    "{:>4}  {}  ({} comment(s))",
                    post.id,
                    post.title,
                    post.comments.len()
                );
            }
        }
    }
    Ok(())
}

fn print_post(post: &Post) {
    println!("Post {}: {}", post.id, post.title);
    if post.comments.is_empty() {
        println!("  (no comments)");
    }
    for comment in &post.comments {
        println!("  [{}] {}", comment.id, comment.text);
    }
}
