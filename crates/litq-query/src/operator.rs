//! Boolean operators and their multilingual synonyms.
//!
//! Queries may spell operators in English or German (`und`, `oder`, `nicht`, ...).
//! An [`OperatorTable`] maps every accepted spelling onto one of the three
//! canonical [`Operator`]s. Tables are immutable once built and owned by the
//! parser that uses them.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A canonical boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Exclusion ("and not").
    Not,
}

impl Operator {
    /// All operators, in display order.
    pub const ALL: [Self; 3] = [Self::And, Self::Or, Self::Not];

    /// Returns the canonical upper-case spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorTable::default()
            .normalize(s)
            .ok_or_else(|| format!("unknown operator: {s}"))
    }
}

/// Longest spelling, in bytes, that an [`OperatorTable`] will look up.
pub const MAX_SYNONYM_LEN: usize = 16;

/// Returns true if the tokenizer can produce `word` as one operator token.
///
/// A spelling must be non-empty, at most [`MAX_SYNONYM_LEN`] bytes long, and
/// free of whitespace, parentheses, quotes and `[`.
pub fn is_matchable_synonym(word: &str) -> bool {
    !word.is_empty()
        && word.len() <= MAX_SYNONYM_LEN
        && !word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\'' | '['))
}

/// Built-in synonyms, keyed by lower-case spelling.
const BUILTIN_SYNONYMS: &[(&str, Operator)] = &[
    ("and", Operator::And),
    ("und", Operator::And),
    ("or", Operator::Or),
    ("oder", Operator::Or),
    ("not", Operator::Not),
    ("nicht", Operator::Not),
    ("kein", Operator::Not),
    ("keine", Operator::Not),
    ("ohne", Operator::Not),
];

/// Immutable lookup from operator spellings to canonical operators.
///
/// Matching is case-insensitive and exact: `AND`, `and` and `And` all match,
/// `ANDY` does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable {
    /// Lower-cased spelling to operator.
    synonyms: HashMap<String, Operator>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self {
            synonyms: BUILTIN_SYNONYMS
                .iter()
                .map(|(word, op)| ((*word).to_string(), *op))
                .collect(),
        }
    }
}

impl OperatorTable {
    /// Creates a table with no synonyms at all.
    pub fn empty() -> Self {
        Self {
            synonyms: HashMap::new(),
        }
    }

    /// Returns a copy of this table with one more spelling for `op`.
    ///
    /// Spellings that fail [`is_matchable_synonym`] after trimming are
    /// skipped. A spelling that already maps to another operator is remapped.
    #[must_use]
    pub fn with_synonym(mut self, word: &str, op: Operator) -> Self {
        let key = word.trim().to_lowercase();
        if is_matchable_synonym(&key) {
            self.synonyms.insert(key, op);
        } else {
            debug!(word, operator = %op, "skipping operator spelling that can never match");
        }
        self
    }

    /// Maps a token to its canonical operator, or `None` if it is not one.
    ///
    /// A `Some` result says nothing about whether the token sits in a valid
    /// operator position; placement is checked by the grammar.
    pub fn normalize(&self, token: &str) -> Option<Operator> {
        if token.is_empty() || token.len() > MAX_SYNONYM_LEN {
            return None;
        }
        self.synonyms.get(&token.to_lowercase()).copied()
    }

    /// Returns true if the token is an operator spelling.
    pub fn is_operator(&self, token: &str) -> bool {
        self.normalize(token).is_some()
    }

    /// Returns all spellings of `op`, sorted.
    pub fn spellings(&self, op: Operator) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .synonyms
            .iter()
            .filter(|(_, o)| **o == op)
            .map(|(w, _)| w.as_str())
            .collect();
        words.sort_unstable();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_and_german_spellings() {
        let table = OperatorTable::default();
        assert_eq!(table.normalize("AND"), Some(Operator::And));
        assert_eq!(table.normalize("UND"), Some(Operator::And));
        assert_eq!(table.normalize("OR"), Some(Operator::Or));
        assert_eq!(table.normalize("ODER"), Some(Operator::Or));
        for word in ["NOT", "NICHT", "KEIN", "KEINE", "OHNE"] {
            assert_eq!(table.normalize(word), Some(Operator::Not), "{word}");
        }
    }

    #[test]
    fn case_insensitive() {
        let table = OperatorTable::default();
        assert_eq!(table.normalize("and"), Some(Operator::And));
        assert_eq!(table.normalize("And"), Some(Operator::And));
        assert_eq!(table.normalize("oDeR"), Some(Operator::Or));
    }

    #[test]
    fn non_operators() {
        let table = OperatorTable::default();
        assert_eq!(table.normalize("XYZ"), None);
        assert_eq!(table.normalize("ANDY"), None);
        assert_eq!(table.normalize(""), None);
        assert_eq!(table.normalize("\"and\""), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = OperatorTable::default();
        for (word, _) in BUILTIN_SYNONYMS {
            let once = table.normalize(word).unwrap();
            let twice = table.normalize(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn custom_synonyms() {
        let table = OperatorTable::default()
            .with_synonym("SANS", Operator::Not)
            .with_synonym("  ", Operator::And);
        assert_eq!(table.normalize("sans"), Some(Operator::Not));
        assert_eq!(table.spellings(Operator::Not).len(), 6);
        assert_eq!(table.spellings(Operator::And), vec!["and", "und"]);
    }

    #[test]
    fn unmatchable_synonyms_are_skipped() {
        let longest = "x".repeat(MAX_SYNONYM_LEN);
        let table = OperatorTable::default()
            .with_synonym("as well as", Operator::And)
            .with_synonym("a(b", Operator::And)
            .with_synonym(&"y".repeat(MAX_SYNONYM_LEN + 1), Operator::Or)
            .with_synonym(&longest, Operator::Or);
        assert_eq!(table.spellings(Operator::And), vec!["and", "und"]);
        assert_eq!(table.spellings(Operator::Or), vec!["oder", "or", longest.as_str()]);
        assert_eq!(table.normalize(&longest), Some(Operator::Or));
    }

    #[test]
    fn matchable_synonym_rules() {
        assert!(is_matchable_synonym("sowie"));
        assert!(is_matchable_synonym("&"));
        assert!(!is_matchable_synonym(""));
        assert!(!is_matchable_synonym("a b"));
        assert!(!is_matchable_synonym("'a'"));
        assert!(!is_matchable_synonym("a[b"));
        assert!(!is_matchable_synonym(&"z".repeat(MAX_SYNONYM_LEN + 1)));
    }

    #[test]
    fn empty_table_knows_nothing() {
        assert!(!OperatorTable::empty().is_operator("AND"));
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("oder".parse::<Operator>(), Ok(Operator::Or));
        assert!("maybe".parse::<Operator>().is_err());
    }
}
