//! CLI command implementations.

pub mod comments;
pub mod init;
pub mod posts;

use std::path::Path;
use tally_blog::BlogContext;
use tracing::debug;

/// Result type shared by every command.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Opens the blog at `path`, creating it if needed.
fn open(path: &Path) -> Result<BlogContext, Box<dyn std::error::Error>> {
    debug!(path = %path.display(), "opening blog");
    Ok(BlogContext::open(path)?)
}
