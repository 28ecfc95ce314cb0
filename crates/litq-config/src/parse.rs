//! Configuration file parsing.
//!
//! Parses individual `.litq.toml` files into `RawConfig` structures whose
//! fields stay optional until merging.

use std::{fs, path::Path};

use litq_query::MixingPolicy;
use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// Mirrors the TOML schema exactly; every field is optional so partial files
/// can be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and user configs.
    pub root: Option<bool>,
    /// Parser settings section.
    pub parser: Option<RawParserSettings>,
    /// Extra operator spellings.
    pub operators: Option<RawOperatorSettings>,
    /// Compile settings section.
    pub compile: Option<RawCompileSettings>,
}

/// Raw parser settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawParserSettings {
    /// Operator mixing policy.
    pub mixing: Option<MixingPolicy>,
    /// Maximum parenthesis nesting depth.
    pub max_depth: Option<usize>,
    /// Maximum tokens per line.
    pub max_tokens: Option<usize>,
}

/// Raw operator synonyms, one list per operator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOperatorSettings {
    /// Extra spellings of AND.
    pub and: Option<Vec<String>>,
    /// Extra spellings of OR.
    pub or: Option<Vec<String>>,
    /// Extra spellings of NOT.
    pub not: Option<Vec<String>>,
}

/// Raw compile settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCompileSettings {
    /// Default backend(s). Accepts a single name or an array of names.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub backend: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.root.is_none());
        assert!(config.parser.is_none());
        assert!(config.operators.is_none());
        assert!(config.compile.is_none());
    }

    #[test]
    fn test_parse_parser_settings() {
        let toml = r#"
[parser]
mixing = "strict"
max_depth = 8
"#;
        let parser = parse_config(toml).unwrap().parser.unwrap();
        assert_eq!(parser.mixing, Some(MixingPolicy::Strict));
        assert_eq!(parser.max_depth, Some(8));
        assert!(parser.max_tokens.is_none());
    }

    #[test]
    fn test_parse_operator_lists() {
        let toml = r#"
[operators]
and = ["&", "plus"]
not = ["sans"]
"#;
        let ops = parse_config(toml).unwrap().operators.unwrap();
        assert_eq!(ops.and, Some(vec!["&".to_string(), "plus".to_string()]));
        assert!(ops.or.is_none());
        assert_eq!(ops.not, Some(vec!["sans".to_string()]));
    }

    #[test]
    fn test_parse_backend_single_or_many() {
        let one = parse_config("[compile]\nbackend = \"cochrane\"\n").unwrap();
        assert_eq!(one.compile.unwrap().backend, Some(vec!["cochrane".to_string()]));

        let many = parse_config("[compile]\nbackend = [\"pubmed\", \"europepmc\"]\n").unwrap();
        assert_eq!(
            many.compile.unwrap().backend,
            Some(vec!["pubmed".to_string(), "europepmc".to_string()])
        );

        let none = parse_config("[compile]\n").unwrap();
        assert!(none.compile.unwrap().backend.is_none());
    }

    #[test]
    fn test_parse_invalid_mixing_policy() {
        assert!(parse_config("[parser]\nmixing = \"sometimes\"\n").is_err());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_config_str("root = ", Path::new("/tmp/bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("/tmp/bad.toml"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/.litq.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
