//! Configuration system for litq.
//!
//! litq reads TOML files named `.litq.toml`, collected by walking up the
//! directory tree from the current working directory, then a user
//! configuration file with the lowest precedence. `litq init` writes both
//! kinds from [`render_template`].

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

use litq_backend::Target;
use litq_query::{Limits, MixingPolicy, Operator, OperatorTable, QueryParser};
use serde::{Deserialize, Serialize};

pub use discovery::{
    CONFIG_FILENAME, USER_CONFIG_FILENAME, discover_config_files, is_user_config,
    user_config_file, user_config_path,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawCompileSettings, RawConfig, RawOperatorSettings, RawParserSettings, parse_config_file,
    parse_config_str,
};
pub use templates::{TemplateOptions, render_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for litq.
///
/// The fully resolved configuration after merging all discovered
/// `.litq.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Query parser settings.
    pub parser: ParserSettings,
    /// Extra operator spellings.
    pub operators: OperatorSettings,
    /// Compilation settings.
    pub compile: CompileSettings,
    /// The merged config files, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.litq.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Builds a query parser from these settings.
    pub fn query_parser(&self) -> QueryParser {
        QueryParser::new(
            self.operators.table(),
            self.parser.mixing,
            self.parser.limits(),
        )
    }

    /// Resolves the configured default backends.
    pub fn default_targets(&self) -> Vec<Target> {
        self.compile
            .backend
            .iter()
            .map(|name| Target::resolve(name))
            .collect()
    }

    /// Serializes the effective settings to TOML.
    ///
    /// The output has the same shape as a `.litq.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parser: &self.parser,
            operators: &self.operators,
            compile: &self.compile,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Query parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Which operators may share a nesting level.
    pub mixing: MixingPolicy,
    /// Maximum parenthesis nesting depth.
    pub max_depth: usize,
    /// Maximum tokens per query line.
    pub max_tokens: usize,
}

impl ParserSettings {
    /// Returns the configured size limits.
    pub fn limits(&self) -> Limits {
        Limits {
            max_depth: self.max_depth,
            max_tokens: self.max_tokens,
        }
    }
}

impl Default for ParserSettings {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            mixing: MixingPolicy::default(),
            max_depth: limits.max_depth,
            max_tokens: limits.max_tokens,
        }
    }
}

/// Operator spellings added to the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OperatorSettings {
    /// Extra spellings of AND.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<String>,
    /// Extra spellings of OR.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<String>,
    /// Extra spellings of NOT.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not: Vec<String>,
}

impl OperatorSettings {
    /// Iterates over every configured spelling with its operator, AND list
    /// first.
    pub fn entries(&self) -> impl Iterator<Item = (Operator, &String)> {
        [
            (Operator::And, &self.and),
            (Operator::Or, &self.or),
            (Operator::Not, &self.not),
        ]
        .into_iter()
        .flat_map(|(op, words)| words.iter().map(move |w| (op, w)))
    }

    /// Builds the operator table: the built-in spellings plus these.
    ///
    /// A spelling listed for two operators ends up bound to the later one.
    pub fn table(&self) -> OperatorTable {
        self.entries()
            .fold(OperatorTable::default(), |table, (op, word)| {
                table.with_synonym(word, op)
            })
    }
}

/// Compilation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompileSettings {
    /// Default backend names, compiled for when none is given.
    pub backend: Vec<String>,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            backend: vec![String::from("pubmed")],
        }
    }
}

/// The serializable view of the effective settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Parser section.
    parser: &'a ParserSettings,
    /// Operators section.
    operators: &'a OperatorSettings,
    /// Compile section.
    compile: &'a CompileSettings,
}

#[cfg(test)]
mod tests {
    use litq_backend::Backend;

    use super::*;
    use crate::test_support::TestTree;

    #[test]
    fn test_load_without_files_is_default() {
        let config = Config::load_from_files(&[]).unwrap();
        assert_eq!(config.parser, ParserSettings::default());
        assert_eq!(config.compile.backend, ["pubmed"]);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_load_root_config() {
        let tree = TestTree::new();
        let path = tree.root_config(
            "review",
            "[parser]\nmixing = \"strict\"\n[compile]\nbackend = \"cochrane\"\n",
        );
        let cwd = tree.dir("review/queries");

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.parser.mixing, MixingPolicy::Strict);
        assert_eq!(config.default_targets(), [Target::Known(Backend::Cochrane)]);
        assert_eq!(config.sources, [path]);
    }

    #[test]
    fn test_load_reports_bad_file() {
        let tree = TestTree::new();
        let path = tree.root_config("", "[parser\n");
        let err = Config::load_from_files(&[path]).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_query_parser_uses_settings() {
        let mut config = Config::default();
        config.operators.and = vec!["&".into()];
        config.parser.max_depth = 1;

        let parser = config.query_parser();
        let parsed = parser.parse("\"a\" & \"b\"").unwrap();
        assert_eq!(parsed.canonical, "(\"a\" AND \"b\")");
        assert!(parser.parse("((\"a\"))").is_err());
    }

    #[test]
    fn test_later_list_wins_table_conflict() {
        let settings = OperatorSettings {
            and: vec!["plus".into()],
            or: vec!["plus".into()],
            not: Vec::new(),
        };
        assert_eq!(settings.table().normalize("PLUS"), Some(Operator::Or));
    }

    #[test]
    fn test_unknown_default_backend_resolves_unknown() {
        let mut config = Config::default();
        config.compile.backend = vec!["scopus".into()];
        assert_eq!(
            config.default_targets(),
            [Target::Unknown("scopus".into())]
        );
    }

    #[test]
    fn test_settings_to_toml_round_trips() {
        let mut config = Config::default();
        config.operators.not = vec!["sans".into()];
        let toml = config.settings_to_toml().unwrap();
        assert!(toml.contains("[parser]"));
        assert!(toml.contains("mixing = \"permissive\""));
        assert!(!toml.contains("and = "));

        let raw = parse_config_str(&toml, Path::new("effective.toml")).unwrap();
        let reparsed = merge_configs(&[ParsedConfig {
            path: PathBuf::from("/x/.litq.toml"),
            config: raw,
        }]);
        assert_eq!(reparsed.parser, config.parser);
        assert_eq!(reparsed.operators, config.operators);
        assert_eq!(reparsed.compile, config.compile);
    }
}
