//! Init command implementation.

use super::{open, CommandResult};
use std::path::Path;

/// Runs the init command.
pub fn run(path: &Path) -> CommandResult {
    open(path)?;
    println!("Initialized blog database at {}", path.display());
    Ok(())
}
