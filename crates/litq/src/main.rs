//! Command-line interface for the `litq` query compiler.

use std::process::ExitCode;

use litq::cli::{
    CommandContext,
    args::{Commands, parse_cli},
    commands, logging,
};

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);

    // These commands must work even when an existing config file is broken.
    let ctx = match cli.command {
        Commands::Init(_) | Commands::Backends => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
