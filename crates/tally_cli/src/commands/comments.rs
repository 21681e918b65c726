//! Comment command implementations.

use super::{open, CommandResult};
use std::path::Path;

/// Runs the add-comment command.
pub fn add(path: &Path, post_id: i64, text: &str) -> CommandResult {
    let blog = open(path)?;
    let comment = blog.add_comment(post_id, text)?;
    println!("Added comment {} to post {}", comment.id, comment.post_id);
    Ok(())
}
