//! Benchmark utilities.

use tally_blog::{BlogEntity, Comment, Post};
use tally_testkit::Doc;

/// Generate `count` parent docs with IDs starting at 1.
pub fn parents(count: usize) -> Vec<Doc> {
    (1..=count as i64)
        .map(|id| Doc::parent(id).with_body(format!("parent {id}")))
        .collect()
}

/// Generate `count` posts, each with `comments` comments.
///
/// Post and comment IDs start at 1 and never repeat.
pub fn posts_with_comments(count: usize, comments: usize) -> Vec<BlogEntity> {
    let mut entities = Vec::with_capacity(count * (comments + 1));
    let mut comment_id = 0;
    for post_id in 1..=count as i64 {
        entities.push(Post::new(post_id, format!("post {post_id}")).into());
        for _ in 0..comments {
            comment_id += 1;
            entities.push(Comment::new(comment_id, "comment", post_id).into());
        }
    }
    entities
}
