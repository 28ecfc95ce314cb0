//! Implementation of `litq config`.

use std::process::ExitCode;

use litq_config::is_user_config;
use litq_highlight::Highlighter;

use crate::cli::{context::CommandContext, output::dim};

/// Shows the config files in effect, each labeled project or user, and the
/// merged settings.
///
/// Validation warnings are logged when the configuration loads.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let files = &ctx.config.sources;
    if files.is_empty() {
        println!("{}", dim("# no configuration files found; showing defaults"));
    } else {
        for path in files {
            let scope = if is_user_config(path) { "user" } else { "project" };
            println!("{}", dim(&format!("# {scope:<7} {}", path.display())));
        }
    }

    let toml = match ctx.config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let highlighter = Highlighter::new();
    print!("{}", highlighter.highlight_toml(&toml));
    ExitCode::SUCCESS
}
