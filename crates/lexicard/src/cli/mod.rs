//! Command-line interface for lexicard.
//!
//! This module provides the CLI structure for the `lexicard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ImportCommand, ListCommand,
    MarkCommand, SearchCommand, ServeCommand, StatsCommand,
};

/// lexicard - Vocabulary flashcards
///
/// Keep a deck of words with translations and examples, serve it over a
/// small JSON API, and manage it from the terminal.
#[derive(Debug, Parser)]
#[command(name = "lexicard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeCommand),

    /// List cards, newest first
    List(ListCommand),

    /// Search cards
    Search(SearchCommand),

    /// Import cards from a file
    Import(ImportCommand),

    /// Add a single card
    Add(AddCommand),

    /// Mark a card as known (or unknown)
    Mark(MarkCommand),

    /// Change a card's word or translation
    Edit(EditCommand),

    /// Delete a card
    Delete(DeleteCommand),

    /// Show deck statistics
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
