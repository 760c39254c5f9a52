//! CLI command definitions and dispatch.

pub mod down;
pub mod up;

use clap::{Parser, Subcommand};
use codeserve_common::constants::APP_NAME;

/// codeserve — run code-server for the current directory.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Emit log records as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace the development container with a fresh one and start it.
    Up(up::UpArgs),
    /// Remove the development container.
    Down(down::DownArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Up(args) => up::execute(args),
        Command::Down(args) => down::execute(args),
    }
}
