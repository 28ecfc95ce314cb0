//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use litq_backend::Target;
use litq_config::Config;
use litq_query::QueryParser;
use tracing::warn;

use crate::cli::args::ParserArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// Configuration warnings are logged, not fatal.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        for warning in config.validate() {
            warn!("configuration: {warning}");
        }
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds the query parser from configuration and command-line overrides.
    pub fn parser(&self, args: &ParserArgs) -> QueryParser {
        let parser = self.config.query_parser();
        match args.mixing {
            Some(policy) => parser.with_policy(policy),
            None => parser,
        }
    }

    /// Resolves the requested backends, falling back to the configured defaults.
    pub fn targets(&self, names: &[String]) -> Vec<Target> {
        if names.is_empty() {
            self.config.default_targets()
        } else {
            names.iter().map(|name| Target::resolve(name)).collect()
        }
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
