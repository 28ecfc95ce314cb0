//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`.

use std::path::PathBuf;

use crate::{
    CompileSettings, Config, OperatorSettings, ParserSettings,
    parse::{RawCompileSettings, RawConfig, RawOperatorSettings, RawParserSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs are given highest precedence first (closest to the working
/// directory), user config last.
///
/// Merge rules:
/// - Scalar settings and the backend list: first defined value wins
/// - Operator synonyms: accumulated from every file, duplicates dropped
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let mut parser = ParserSettings::default();
    let mut operators = OperatorSettings::default();
    let mut compile = CompileSettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.parser {
            apply_raw_parser(&mut parser, raw);
        }
        if let Some(ref raw) = parsed.config.operators {
            apply_raw_operators(&mut operators, raw);
        }
        if let Some(ref raw) = parsed.config.compile {
            apply_raw_compile(&mut compile, raw);
        }
    }

    Config {
        parser,
        operators,
        compile,
        sources: configs.iter().map(|c| c.path.clone()).collect(),
    }
}

/// Applies raw parser settings, overwriting any present values.
fn apply_raw_parser(result: &mut ParserSettings, raw: &RawParserSettings) {
    if let Some(v) = raw.mixing {
        result.mixing = v;
    }
    if let Some(v) = raw.max_depth {
        result.max_depth = v;
    }
    if let Some(v) = raw.max_tokens {
        result.max_tokens = v;
    }
}

/// Appends raw synonyms not already present.
fn apply_raw_operators(result: &mut OperatorSettings, raw: &RawOperatorSettings) {
    for (target, words) in [
        (&mut result.and, &raw.and),
        (&mut result.or, &raw.or),
        (&mut result.not, &raw.not),
    ] {
        for word in words.iter().flatten() {
            if !target.contains(word) {
                target.push(word.clone());
            }
        }
    }
}

/// Applies raw compile settings.
fn apply_raw_compile(result: &mut CompileSettings, raw: &RawCompileSettings) {
    if let Some(ref v) = raw.backend {
        result.backend.clone_from(v);
    }
}

#[cfg(test)]
mod tests {
    use litq_query::MixingPolicy;

    use super::*;
    use crate::parse::parse_config;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config(toml).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty_is_default() {
        let config = merge_configs(&[]);
        assert_eq!(config.parser, ParserSettings::default());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_closest_scalar_wins() {
        let config = merge_configs(&[
            parsed("/work/review/.litq.toml", "[parser]\nmax_depth = 4\n"),
            parsed(
                "/home/me/.litq.toml",
                "[parser]\nmax_depth = 10\nmixing = \"strict\"\n",
            ),
        ]);
        assert_eq!(config.parser.max_depth, 4);
        assert_eq!(config.parser.mixing, MixingPolicy::Strict);
        assert_eq!(
            config.sources,
            [
                PathBuf::from("/work/review/.litq.toml"),
                PathBuf::from("/home/me/.litq.toml")
            ]
        );
    }

    #[test]
    fn test_backend_list_is_replaced_not_merged() {
        let config = merge_configs(&[
            parsed("/a/.litq.toml", "[compile]\nbackend = \"cochrane\"\n"),
            parsed("/.litq.toml", "[compile]\nbackend = [\"pubmed\", \"europepmc\"]\n"),
        ]);
        assert_eq!(config.compile.backend, ["cochrane"]);
    }

    #[test]
    fn test_synonyms_accumulate() {
        let config = merge_configs(&[
            parsed("/a/.litq.toml", "[operators]\nand = [\"&\", \"plus\"]\n"),
            parsed("/.litq.toml", "[operators]\nand = [\"plus\"]\nnot = [\"sans\"]\n"),
        ]);
        assert_eq!(config.operators.and, ["plus", "&"]);
        assert_eq!(config.operators.not, ["sans"]);
        assert!(config.operators.or.is_empty());
    }
}
