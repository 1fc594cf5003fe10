use anyhow::Result;

pub use args::Arguments;
pub use exit_status::ExitStatus;

pub mod args;
pub mod commands;
mod exit_status;
mod run;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    Ok(result.exit_status())
}
