//! Command implementations and dispatch.

pub mod backends;
pub mod check;
pub mod compile;
pub mod config;
pub mod explain;
pub mod init;
mod shared;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Compile(cmd) => compile::run(ctx, &cmd),
        Commands::Check(cmd) => check::run(ctx, &cmd),
        Commands::Explain(cmd) => explain::run(ctx, &cmd),
        Commands::Backends => backends::run(),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
