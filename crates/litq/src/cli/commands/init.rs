//! Implementation of `litq init`.

use std::{fs, path::PathBuf, process::ExitCode};

use litq_config::{CONFIG_FILENAME, ConfigError, TemplateOptions, render_template, user_config_path};
use litq_highlight::{Highlighter, indent_content};

use crate::cli::{args::InitCommand, context::CommandContext, output::success};

/// Writes a configuration file with the chosen backends and mixing policy.
///
/// `--global` writes the user file in the platform config directory,
/// creating that directory if needed.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let path = match target_path(ctx, cmd) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if path.exists() && !cmd.force {
        eprintln!("error: configuration file already exists: {}", path.display());
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let defaults = TemplateOptions::default();
    let options = TemplateOptions {
        backends: if cmd.backends.is_empty() {
            defaults.backends
        } else {
            cmd.backends.clone()
        },
        mixing: cmd.mixing.unwrap_or(defaults.mixing),
        user: cmd.global,
    };
    let template = render_template(&options);

    let written = match path.parent() {
        Some(dir) => fs::create_dir_all(dir).and_then(|()| fs::write(&path, &template)),
        None => fs::write(&path, &template),
    };
    if let Err(e) = written {
        eprintln!("error: failed to write {}: {e}", path.display());
        return ExitCode::FAILURE;
    }

    println!("{}", success(&format!("Created {}", path.display())));
    println!();
    println!("{}", indent_content(&Highlighter::new().highlight_toml(&template), 2));
    ExitCode::SUCCESS
}

/// Picks the file to write: the user file or `.litq.toml` in the working
/// directory.
fn target_path(ctx: &CommandContext, cmd: &InitCommand) -> Result<PathBuf, ConfigError> {
    if cmd.global {
        user_config_path().ok_or(ConfigError::NoHomeDirectory)
    } else {
        Ok(ctx.cwd.join(CONFIG_FILENAME))
    }
}
