use std::env;

use anyhow::{Context, Result};

use crate::cli::args::{Arguments, Command};
use crate::cli::commands::{CommandResult, annotate::annotate, extract::extract, init::init};

/// Dispatch to the appropriate command handler based on the parsed
/// arguments.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Annotate(cmd)) => annotate(cmd),
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Init) => {
            let cwd = env::current_dir().context("failed to resolve current directory")?;
            init(&cwd)?;
            Ok(CommandResult::default())
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
