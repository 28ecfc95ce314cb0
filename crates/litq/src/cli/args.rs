//! Clap argument definitions for the `litq` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use litq_backend::Backend;
use litq_query::MixingPolicy;

/// Parses a mixing policy from a string.
fn parse_mixing(s: &str) -> Result<MixingPolicy, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "litq", version)]
#[command(about = "Validate and compile boolean literature queries")]
pub struct Cli {
    /// Log verbosity (-v for info, -vv for debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Where query text comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryInput {
    /// Query text; several queries are combined with OR
    #[arg(required_unless_present = "files")]
    pub queries: Vec<String>,

    /// Read a query from a file (can be specified multiple times)
    #[arg(short = 'f', long = "file")]
    pub files: Vec<PathBuf>,
}

/// Parser overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ParserArgs {
    /// Operator mixing policy: permissive or strict [default: from config]
    #[arg(long, value_parser = parse_mixing)]
    pub mixing: Option<MixingPolicy>,
}

/// Arguments for `litq compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// Query sources.
    #[command(flatten)]
    pub input: QueryInput,

    /// Target backend (can be specified multiple times) [default: from config]
    #[arg(short = 'b', long = "backend")]
    pub backends: Vec<String>,

    /// Parser overrides.
    #[command(flatten)]
    pub parser: ParserArgs,

    /// Output the compile result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `litq check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Query files, one query per file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Parser overrides.
    #[command(flatten)]
    pub parser: ParserArgs,

    /// Output the results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `litq explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    /// Query sources.
    #[command(flatten)]
    pub input: QueryInput,

    /// Parser overrides.
    #[command(flatten)]
    pub parser: ParserArgs,

    /// Output the parse as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parses a backend name, rejecting names no backend answers to.
fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}

/// Arguments for `litq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Write the user configuration instead of ./.litq.toml
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,

    /// Default backend to write (can be specified multiple times) [default: pubmed]
    #[arg(short = 'b', long = "backend", value_parser = parse_backend)]
    pub backends: Vec<Backend>,

    /// Operator mixing policy to write: permissive or strict [default: permissive]
    #[arg(long, value_parser = parse_mixing)]
    pub mixing: Option<MixingPolicy>,
}

/// Supported `litq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a query and translate it for one or more backends
    #[command(after_help = "\
QUERY SYNTAX:
  \"phrase\"              Quoted phrase (single or double quotes)
  \"phrase\"[CODE]        Field-qualified phrase, e.g. \"cancer\"[MeSH]
  a AND b, a OR b       Boolean joins (also UND, ODER)
  a NOT b               Exclusion (also NICHT, KEIN, KEINE, OHNE)
  (expr)                Grouping; required to mix AND and OR
  # comment             Ignored to end of line

MULTI-LINE FORMAT:
  One operand per line, separated by lines holding a single operator.
  All operator lines must use the same operator.

EXAMPLES:
  litq compile '(\"cancer\"[MeSH] OR \"tumor\"[TIAB]) AND \"2015:2025\"[pdat]'
  litq compile -b europepmc -f strategy.txt
  litq compile --json '\"asthma\"[MeSH]' '\"wheeze\"[TIAB]'")]
    Compile(CompileCommand),

    /// Validate query files and report each one
    Check(CheckCommand),

    /// Show how a query is tokenized and parsed
    Explain(ExplainCommand),

    /// List supported backends and their dialects
    Backends,

    /// Write a litq configuration file for this directory or the user
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compile_requires_a_query_or_file() {
        assert!(Cli::try_parse_from(["litq", "compile"]).is_err());
        assert!(Cli::try_parse_from(["litq", "compile", "-f", "q.txt"]).is_ok());
        assert!(Cli::try_parse_from(["litq", "compile", "\"a\""]).is_ok());
    }

    #[test]
    fn mixing_flag_parses() {
        let cli = Cli::try_parse_from(["litq", "compile", "--mixing", "STRICT", "\"a\""]).unwrap();
        let Commands::Compile(cmd) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(cmd.parser.mixing, Some(MixingPolicy::Strict));
        assert!(Cli::try_parse_from(["litq", "compile", "--mixing", "loose", "\"a\""]).is_err());
    }

    #[test]
    fn init_takes_backends_and_mixing() {
        let cli = Cli::try_parse_from([
            "litq", "init", "-b", "epmc", "--backend", "Cochrane", "--mixing", "strict",
        ])
        .unwrap();
        let Commands::Init(cmd) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(cmd.backends, [Backend::EuropePmc, Backend::Cochrane]);
        assert_eq!(cmd.mixing, Some(MixingPolicy::Strict));
        assert!(!cmd.global);
    }

    #[test]
    fn init_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["litq", "init", "-b", "scopus"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["litq", "backends", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
