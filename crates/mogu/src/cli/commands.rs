//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::dispatch::{Command, Invoker};
use crate::restaurant::NewRestaurant;

/// User id recorded for commands run from the terminal.
pub const LOCAL_USER: &str = "local";

/// Who is running the command.
#[derive(Debug, Args)]
pub struct InvokerArgs {
    /// User id to act as
    #[arg(short, long, default_value = LOCAL_USER)]
    pub user: String,

    /// Output the structured outcome as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl InvokerArgs {
    /// The invoker for a non-privileged command.
    #[must_use]
    pub fn member(&self) -> Invoker {
        Invoker::member(self.user.clone())
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Restaurant name
    pub name: String,

    /// Area, e.g. Hongdae
    pub area: String,

    /// Genre, e.g. Ramen
    pub genre: String,

    /// Short reason to go
    pub review: String,

    /// Waiting times, tips
    #[arg(short, long)]
    pub memo: Option<String>,

    #[command(flatten)]
    pub invoker: InvokerArgs,
}

impl AddCommand {
    /// Convert into a dispatchable command.
    #[must_use]
    pub fn to_command(&self) -> Command {
        Command::Add(NewRestaurant {
            name: self.name.clone(),
            area: self.area.clone(),
            genre: self.genre.clone(),
            review: self.review.clone(),
            memo: self.memo.clone(),
        })
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// 1-based number in the full list
    #[arg(allow_negative_numbers = true)]
    pub position: i64,

    /// Act with administrator rights
    #[arg(long)]
    pub admin: bool,

    #[command(flatten)]
    pub invoker: InvokerArgs,
}

impl DeleteCommand {
    /// The invoker, privileged if `--admin` was given.
    #[must_use]
    pub fn invoker(&self) -> Invoker {
        if self.admin {
            Invoker::admin(self.invoker.user.clone())
        } else {
            self.invoker.member()
        }
    }
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in name, area or genre
    pub keyword: String,

    #[command(flatten)]
    pub invoker: InvokerArgs,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub invoker: InvokerArgs,
}

/// Command manifest arguments.
#[derive(Debug, Args)]
pub struct CommandsCommand {
    /// Which names to print
    #[arg(short, long, value_enum, default_value = "english")]
    pub naming: NamingArg,
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

/// Command naming argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    /// add-restaurant, delete-restaurant, ...
    English,
    /// 맛집추가, 맛집삭제, ...
    Korean,
}

impl From<NamingArg> for crate::registry::Naming {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::English => Self::English,
            NamingArg::Korean => Self::Korean,
        }
    }
}
