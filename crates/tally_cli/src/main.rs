//! Tally CLI
//!
//! A small blog kept in a SQLite file. Every command that changes data
//! runs as one unit of work and commits once.
//!
//! # Commands
//!
//! - `init` - Create the database and its tables
//! - `create-post` - Add a post
//! - `add-comment` - Comment on a post
//! - `delete-post` - Delete a post and its comments
//! - `show-post` - Print one post with its comments
//! - `list-posts` - Print every post

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Tally command-line blog.
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long, default_value = "tally.db")]
    db: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,

    /// Add a post
    CreatePost {
        /// Post title
        title: String,
    },

    /// Comment on a post
    AddComment {
        /// ID of the post
        post_id: i64,

        /// Comment text
        text: String,
    },

    /// Delete a post and its comments
    DeletePost {
        /// ID of the post
        post_id: i64,
    },

    /// Print one post with its comments
    ShowPost {
        /// ID of the post
        post_id: i64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print every post
    ListPosts {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => commands::init::run(&cli.db)?,
        Commands::CreatePost { title } => commands::posts::create(&cli.db, &title)?,
        Commands::AddComment { post_id, text } => {
            commands::comments::add(&cli.db, post_id, &text)?;
        }
        Commands::DeletePost { post_id } => commands::posts::delete(&cli.db, post_id)?,
        Commands::ShowPost { post_id, format } => {
            commands::posts::show(&cli.db, post_id, &format)?;
        }
        Commands::ListPosts { format } => commands::posts::list(&cli.db, &format)?,
        Commands::Version => {
            println!("Tally CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Tally Core v{}", tally_core::VERSION);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_comment() {
        let cli = Cli::parse_from(["tally", "--db", "blog.db", "add-comment", "3", "nice"]);
        assert_eq!(cli.db, PathBuf::from("blog.db"));
        assert!(matches!(
            cli.command,
            Commands::AddComment { post_id: 3, ref text } if text == "nice"
        ));
    }

    #[test]
    fn db_defaults_and_format() {
        let cli = Cli::parse_from(["tally", "list-posts", "--format", "json"]);
        assert_eq!(cli.db, PathBuf::from("tally.db"));
        assert!(matches!(cli.command, Commands::ListPosts { ref format } if format == "json"));
    }
}
