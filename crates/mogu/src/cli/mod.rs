//! Command-line interface for mogu.
//!
//! This module provides the CLI structure for the `mogu` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, CommandsCommand, ConfigCommand, DeleteCommand, InvokerArgs, ListCommand, NamingArg,
    SearchCommand, LOCAL_USER,
};

use crate::logging::Verbosity;

/// mogu - Share and find restaurant recommendations
///
/// Runs the restaurant bot's commands against a local list, either one at a
/// time from the terminal or as a stream of chat events on stdin.
#[derive(Debug, Parser)]
#[command(name = "mogu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Restaurant file to use instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

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
    /// Add a restaurant to the list
    Add(AddCommand),

    /// Delete a restaurant by its list number (administrators only)
    Delete(DeleteCommand),

    /// Find restaurants by name, area or genre
    Search(SearchCommand),

    /// Show the saved restaurant list
    List(ListCommand),

    /// Read chat command events from stdin, one JSON object per line
    Serve,

    /// Print the slash-command manifest
    Commands(CommandsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
