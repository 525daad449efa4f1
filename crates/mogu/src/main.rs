//! `mogu` - CLI for the restaurant bot
//!
//! This binary runs the bot's commands against the local restaurant list,
//! either one at a time or as a stream of chat events on stdin.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use mogu::cli::{Cli, Command, ConfigCommand, InvokerArgs};
use mogu::dispatch::{Command as BotCommand, Invoker};
use mogu::registry::command_definitions;
use mogu::render::render;
use mogu::{init_logging, serve, Config, Dispatcher};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(data) = cli.data {
        config.storage.data_path = Some(data);
    }
    debug!("Using restaurant file {}", config.data_path().display());

    match cli.command {
        Command::Add(cmd) => run_command(
            &config,
            &cmd.invoker,
            &cmd.invoker.member(),
            cmd.to_command(),
        ),
        Command::Delete(cmd) => run_command(
            &config,
            &cmd.invoker,
            &cmd.invoker(),
            BotCommand::Delete {
                position: cmd.position,
            },
        ),
        Command::Search(cmd) => run_command(
            &config,
            &cmd.invoker,
            &cmd.invoker.member(),
            BotCommand::Search {
                keyword: cmd.keyword,
            },
        ),
        Command::List(cmd) => run_command(
            &config,
            &cmd.invoker,
            &cmd.invoker.member(),
            BotCommand::List,
        ),
        Command::Serve => handle_serve(&config),
        Command::Commands(cmd) => {
            let definitions = command_definitions(cmd.naming.into());
            println!("{}", serde_json::to_string_pretty(&definitions)?);
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn run_command(
    config: &Config,
    args: &InvokerArgs,
    invoker: &Invoker,
    command: BotCommand,
) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config);
    let kind = command.kind();
    let outcome = dispatcher
        .dispatch(invoker, command)
        .with_context(|| format!("{kind} failed"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", render(&outcome).content);
    }
    Ok(())
}

fn handle_serve(config: &Config) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        serve::run(&dispatcher, stdin, tokio::io::stdout()).await
    })?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let shown = config.redacted();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                let unset = || "(not set)".to_string();
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data path:          {}", shown.data_path().display());
                println!("  Versioned file:     {}", shown.storage.versioned);
                println!();
                println!("[Bot]");
                println!("  Token:              {}", shown.bot.token.unwrap_or_else(unset));
                println!(
                    "  Application id:     {}",
                    shown.bot.application_id.unwrap_or_else(unset)
                );
                println!("  Guild id:           {}", shown.bot.guild_id.unwrap_or_else(unset));
                println!("  Extra admins:       {}", shown.bot.admin_ids.len());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
