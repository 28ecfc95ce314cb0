//! Configuration validation.
//!
//! Reports settings that load fine but will not behave as intended.

use std::{collections::HashMap, fmt};

use litq_backend::Backend;
use litq_query::{MAX_SYNONYM_LEN, Operator, OperatorTable, is_matchable_synonym};

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A spelling is configured for two different operators.
    SynonymConflict {
        /// The spelling.
        word: String,
        /// The operator it is already bound to.
        first: Operator,
        /// The operator it is also configured for.
        second: Operator,
    },
    /// A configured spelling is blank.
    EmptySynonym {
        /// The operator list containing it.
        operator: Operator,
    },
    /// A configured spelling can never be produced by the tokenizer.
    UnmatchableSynonym {
        /// The spelling.
        word: String,
    },
    /// A parser limit is zero, so every query will fail.
    ZeroLimit {
        /// The setting name.
        setting: &'static str,
    },
    /// The backend list is empty.
    NoDefaultBackend,
    /// A default backend names no known backend.
    UnknownBackend {
        /// The configured name.
        name: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SynonymConflict {
                word,
                first,
                second,
            } => write!(
                f,
                "synonym '{word}' maps to both {first} and {second}; {second} wins"
            ),
            Self::EmptySynonym { operator } => {
                write!(f, "empty synonym in the {operator} list is ignored")
            }
            Self::UnmatchableSynonym { word } => write!(
                f,
                "synonym '{word}' can never match: operators are single words of at most {MAX_SYNONYM_LEN} bytes"
            ),
            Self::ZeroLimit { setting } => {
                write!(f, "parser.{setting} is 0; every query will be rejected")
            }
            Self::NoDefaultBackend => write!(f, "no default backend is configured"),
            Self::UnknownBackend { name } => write!(
                f,
                "default backend '{name}' is unknown; queries will be passed through unchanged"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = validate_synonyms(config);

    if config.parser.max_depth == 0 {
        warnings.push(ConfigWarning::ZeroLimit {
            setting: "max_depth",
        });
    }
    if config.parser.max_tokens == 0 {
        warnings.push(ConfigWarning::ZeroLimit {
            setting: "max_tokens",
        });
    }

    if config.compile.backend.is_empty() {
        warnings.push(ConfigWarning::NoDefaultBackend);
    }
    for name in &config.compile.backend {
        if name.parse::<Backend>().is_err() {
            warnings.push(ConfigWarning::UnknownBackend { name: name.clone() });
        }
    }

    warnings
}

/// Checks the synonym lists against each other and the built-in table.
fn validate_synonyms(config: &Config) -> Vec<ConfigWarning> {
    let builtins = OperatorTable::default();
    let mut warnings = Vec::new();
    let mut seen: HashMap<String, Operator> = HashMap::new();

    for (op, word) in config.operators.entries() {
        let key = word.trim().to_lowercase();
        if key.is_empty() {
            warnings.push(ConfigWarning::EmptySynonym { operator: op });
            continue;
        }
        if !is_matchable_synonym(&key) {
            warnings.push(ConfigWarning::UnmatchableSynonym { word: word.clone() });
            continue;
        }
        let first = seen
            .get(&key)
            .copied()
            .or_else(|| builtins.normalize(&key));
        if let Some(first) = first
            && first != op
        {
            warnings.push(ConfigWarning::SynonymConflict {
                word: key.clone(),
                first,
                second: op,
            });
        }
        seen.insert(key, op);
    }

    warnings
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_synonym_for_two_operators() {
        let mut config = Config::default();
        config.operators.and = vec!["plus".into()];
        config.operators.or = vec!["Plus".into()];
        assert_eq!(
            validate_config(&config),
            [ConfigWarning::SynonymConflict {
                word: "plus".into(),
                first: Operator::And,
                second: Operator::Or,
            }]
        );
    }

    #[test]
    fn test_synonym_rebinding_builtin() {
        let mut config = Config::default();
        config.operators.not = vec!["und".into()];
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("AND and NOT"));
    }

    #[test]
    fn test_repeating_builtin_is_fine() {
        let mut config = Config::default();
        config.operators.or = vec!["oder".into()];
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_empty_and_unmatchable_synonyms() {
        let mut config = Config::default();
        config.operators.and = vec!["  ".into(), "as well as".into(), "a(b".into()];
        let warnings = validate_config(&config);
        assert_eq!(warnings[0], ConfigWarning::EmptySynonym { operator: Operator::And });
        assert!(matches!(warnings[1], ConfigWarning::UnmatchableSynonym { .. }));
        assert!(matches!(warnings[2], ConfigWarning::UnmatchableSynonym { .. }));
    }

    #[test]
    fn test_overlong_synonym_warns_and_never_matches() {
        let word = "u".repeat(MAX_SYNONYM_LEN + 1);
        let mut config = Config::default();
        config.operators.and = vec![word.clone()];
        assert_eq!(
            validate_config(&config),
            [ConfigWarning::UnmatchableSynonym { word: word.clone() }]
        );
        assert!(!config.operators.table().is_operator(&word));
    }

    #[test]
    fn test_zero_limits() {
        let mut config = Config::default();
        config.parser.max_depth = 0;
        config.parser.max_tokens = 0;
        assert_eq!(
            validate_config(&config),
            [
                ConfigWarning::ZeroLimit { setting: "max_depth" },
                ConfigWarning::ZeroLimit { setting: "max_tokens" },
            ]
        );
    }

    #[test]
    fn test_backend_warnings() {
        let mut config = Config::default();
        config.compile.backend.clear();
        assert_eq!(validate_config(&config), [ConfigWarning::NoDefaultBackend]);

        config.compile.backend = vec!["pubmed".into(), "scopus".into()];
        assert_eq!(
            validate_config(&config),
            [ConfigWarning::UnknownBackend {
                name: "scopus".into()
            }]
        );
    }
}
