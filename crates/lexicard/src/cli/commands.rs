//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::card::NewExample;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Owner whose cards to list
    #[arg(short, long)]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Case-insensitive text to look for in words, translations and examples
    pub query: String,

    /// Owner whose cards to search
    #[arg(short, long)]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON or `word - translation` text file
    pub file: PathBuf,

    /// Owner of the imported cards
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// The word being learned
    pub word: String,

    /// Its translation
    pub translation: String,

    /// Usage example as `text=translation` (repeatable)
    #[arg(short, long = "example", value_name = "TEXT=TRANSLATION", value_parser = parse_example)]
    pub examples: Vec<NewExample>,

    /// Owner of the new card
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Mark command arguments.
#[derive(Debug, Args)]
pub struct MarkCommand {
    /// Card id
    pub id: String,

    /// Mark as not known instead
    #[arg(long)]
    pub unknown: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Card id
    pub id: String,

    /// New word
    #[arg(short, long)]
    pub word: Option<String>,

    /// New translation
    #[arg(short, long)]
    pub translation: Option<String>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Card id
    pub id: String,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Owner whose deck to summarize
    #[arg(short, long)]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Parse `text=translation` into an example.
fn parse_example(raw: &str) -> Result<NewExample, String> {
    match raw.split_once('=') {
        Some((text, translation)) if !text.trim().is_empty() => {
            Ok(NewExample::new(text.trim(), translation.trim()))
        }
        _ => Err(format!("expected TEXT=TRANSLATION, got {raw:?}")),
    }
}
