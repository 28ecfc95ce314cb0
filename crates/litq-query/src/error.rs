//! Error types for query validation.
//!
//! Validation stops at the first violation it finds, so every failed parse
//! carries exactly one [`QueryError`]. The error records what went wrong, the
//! text it was found in, and where possible the line and byte position.

use std::{error::Error, fmt};

use crate::operator::Operator;

/// Which sub-condition of the field-term pattern `"text"[CODE]` was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldTermDefect {
    /// Bracket or quote structure on a term that does not start with a quote.
    #[error("the term is not quoted")]
    Unquoted,
    /// The opening quote is never closed.
    #[error("the closing quote is missing")]
    UnterminatedQuote,
    /// Text after the closing quote that is not a `[CODE]` suffix.
    #[error("expected a [FIELD] code after the closing quote")]
    MissingFieldCode,
    /// `[]` with nothing inside.
    #[error("the field code is empty")]
    EmptyFieldCode,
    /// The field code contains characters other than letters, digits and `_`.
    #[error("the field code may only contain letters, digits and underscores")]
    InvalidFieldCode,
    /// The `[` is never closed.
    #[error("the field code is missing its closing ']'")]
    UnterminatedFieldCode,
    /// Characters follow the closing `]`.
    #[error("unexpected text after the field code")]
    TrailingText,
    /// The quoted body is empty.
    #[error("the quoted text is empty")]
    TooShort,
}

/// Which structural rule of the multi-line format was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultilineDefect {
    /// Fewer than three lines.
    #[error("multi-line queries need at least 3 lines, found {count}")]
    TooFewLines {
        /// Number of lines found.
        count: usize,
    },
    /// An even number of lines, so the block ends on an operator.
    #[error("multi-line queries need an odd number of lines, found {count}")]
    EvenLineCount {
        /// Number of lines found.
        count: usize,
    },
    /// An operator line holds something other than a single operator.
    #[error("line {line} must be a single operator, found '{found}'")]
    ExpectedOperator {
        /// 1-based line number.
        line: usize,
        /// The line's content.
        found: String,
    },
    /// Operator lines disagree.
    #[error("line {line} uses {found} but the block is joined with {expected}")]
    MixedOperators {
        /// 1-based line number of the first disagreeing operator line.
        line: usize,
        /// The operator of the first operator line.
        expected: Operator,
        /// The disagreeing operator.
        found: Operator,
    },
    /// A content line opens or closes a group it does not finish.
    #[error("line {line} has unbalanced parentheses")]
    CrossLineParentheses {
        /// 1-based line number.
        line: usize,
    },
}

/// How operators and operands are misarranged within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Placement {
    /// The level starts with an operator.
    #[error("cannot start with operator {0}")]
    Leading(Operator),
    /// The level ends with an operator.
    #[error("cannot end with operator {0}")]
    Trailing(Operator),
    /// Two operators in a row.
    #[error("double operator {0} {1}")]
    Adjacent(Operator, Operator),
    /// Two operands in a row with nothing joining them.
    #[error("missing operator between two terms")]
    MissingOperator,
    /// `()` with nothing inside.
    #[error("empty parentheses")]
    EmptyGroup,
}

/// Which input cap was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Parenthesis nesting depth.
    Depth,
    /// Number of tokens.
    Tokens,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depth => write!(f, "nesting depth"),
            Self::Tokens => write!(f, "token count"),
        }
    }
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryErrorKind {
    /// Nothing left after comments and blank lines are removed.
    #[error("query is empty")]
    EmptyQuery,
    /// A `)` without a matching `(`, or a `(` that is never closed.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    /// AND and OR used at one level without grouping.
    #[error("cannot mix {first} and {second} at the same level without parentheses")]
    MixedOperators {
        /// The first operator seen at the level.
        first: Operator,
        /// The operator that conflicts with it.
        second: Operator,
    },
    /// An operand that is not a quoted phrase or field term.
    #[error("unquoted term '{term}'")]
    InvalidOperand {
        /// The offending token.
        term: String,
    },
    /// A term with quoting or bracket structure that is not a valid field term.
    #[error("malformed field term '{term}': {defect}")]
    MalformedFieldTerm {
        /// The offending token.
        term: String,
        /// The violated sub-condition.
        defect: FieldTermDefect,
    },
    /// The multi-line layout is broken.
    #[error("{0}")]
    MultilineStructure(MultilineDefect),
    /// Operators and operands are not alternating.
    #[error("{0}")]
    MisplacedOperator(Placement),
    /// The input is larger than the parser accepts.
    #[error("query exceeds the maximum {limit} of {max}")]
    LimitExceeded {
        /// The cap that was hit.
        limit: Limit,
        /// The configured maximum.
        max: usize,
    },
}

/// A query validation error.
///
/// Renders as `query syntax error: <message>` followed by the offending text,
/// a pointer at the failing position when one is known, and a hint for common
/// mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// 1-based line number within a multi-line query.
    pub line: Option<usize>,
    /// Byte position within `query`.
    pub position: Option<usize>,
    /// The text the error was found in.
    pub query: Option<String>,
}

impl QueryError {
    /// Creates an error with no location.
    pub fn new(kind: QueryErrorKind) -> Self {
        Self {
            kind,
            line: None,
            position: None,
            query: None,
        }
    }

    /// Creates an error pointing at a byte position in `query`.
    pub fn at(kind: QueryErrorKind, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            position: Some(position),
            query: Some(query.into()),
        }
    }

    /// Creates a multi-line structure error.
    pub fn multiline(defect: MultilineDefect) -> Self {
        let line = match &defect {
            MultilineDefect::ExpectedOperator { line, .. }
            | MultilineDefect::MixedOperators { line, .. }
            | MultilineDefect::CrossLineParentheses { line } => Some(*line),
            MultilineDefect::TooFewLines { .. } | MultilineDefect::EvenLineCount { .. } => None,
        };
        Self {
            kind: QueryErrorKind::MultilineStructure(defect),
            line,
            position: None,
            query: None,
        }
    }

    /// Sets the query string for this error.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Records the line the error was found on, unless one is already set.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::InvalidOperand { .. }
            | QueryErrorKind::MalformedFieldTerm {
                defect: FieldTermDefect::Unquoted,
                ..
            } => Some("Quote every term, e.g. \"cancer\" or \"cancer\"[MeSH]"),
            QueryErrorKind::MalformedFieldTerm {
                defect: FieldTermDefect::EmptyFieldCode,
                ..
            } => Some("Put a field code inside the brackets, e.g. \"cancer\"[TIAB]"),
            QueryErrorKind::MixedOperators { .. } => {
                Some("Group with parentheses, e.g. (\"a\" AND \"b\") OR \"c\"")
            }
            QueryErrorKind::MultilineStructure(MultilineDefect::CrossLineParentheses { .. }) => {
                Some("Use SINGLE-LINE format for cross-line nesting")
            }
            QueryErrorKind::UnbalancedParentheses => {
                Some("Every opening parenthesis ( needs a matching closing one )")
            }
            _ => None,
        }
    }
}

impl From<QueryErrorKind> for QueryError {
    fn from(kind: QueryErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.kind)?;

        if let Some(query) = &self.query {
            let prefix = match self.line {
                Some(line) => format!("line {line}: "),
                None => String::new(),
            };
            writeln!(f, "  {prefix}{query}")?;
            if let Some(pos) = self.position {
                let column = prefix.len() + column_of(query, pos);
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        } else if let Some(line) = self.line {
            writeln!(f, "  at line {line}")?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

/// Returns the character column of byte offset `pos` in `text`.
///
/// Offsets past the end land after the last character.
fn column_of(text: &str, pos: usize) -> usize {
    text.char_indices().take_while(|(i, _)| *i < pos).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_pointer() {
        let err = QueryError::at(
            QueryErrorKind::InvalidOperand {
                term: "cancer".into(),
            },
            0,
            "cancer AND \"tumor\"",
        );
        let display = err.to_string();
        assert!(display.starts_with("query syntax error: unquoted term 'cancer'"));
        assert!(display.contains("  cancer AND \"tumor\"\n  ^"));
        assert!(display.contains("hint: Quote every term"));
    }

    #[test]
    fn pointer_counts_characters_not_bytes() {
        let query = "\"größe\" und tumor";
        let pos = query.find("tumor").unwrap();
        assert_eq!(pos, 14);
        let err = QueryError::at(
            QueryErrorKind::InvalidOperand {
                term: "tumor".into(),
            },
            pos,
            query,
        );
        let caret = format!("\n  {}^\n", " ".repeat(12));
        assert!(err.to_string().contains(&caret), "{err}");
    }

    #[test]
    fn pointer_past_end_is_clamped() {
        let err = QueryError::at(QueryErrorKind::UnbalancedParentheses, 99, "(\"ä\"");
        assert!(err.to_string().contains("\n  (\"ä\"\n      ^\n"), "{err}");
    }

    #[test]
    fn display_with_line() {
        let err = QueryError::at(QueryErrorKind::UnbalancedParentheses, 3, "(\"a\"").at_line(5);
        let display = err.to_string();
        assert!(display.contains("line 5: (\"a\""));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn at_line_keeps_first() {
        let err = QueryError::multiline(MultilineDefect::CrossLineParentheses { line: 3 }).at_line(7);
        assert_eq!(err.line, Some(3));
    }

    #[test]
    fn multiline_message() {
        let err = QueryError::multiline(MultilineDefect::CrossLineParentheses { line: 1 });
        assert_eq!(err.message(), "line 1 has unbalanced parentheses");
        assert!(err.suggestion().unwrap().contains("SINGLE-LINE"));
    }

    #[test]
    fn mixed_operator_message() {
        let err = QueryError::new(QueryErrorKind::MixedOperators {
            first: Operator::And,
            second: Operator::Or,
        });
        assert!(err.message().contains("cannot mix AND and OR"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn placement_messages() {
        let err = QueryError::new(QueryErrorKind::MisplacedOperator(Placement::Leading(
            Operator::And,
        )));
        assert_eq!(err.message(), "cannot start with operator AND");
        assert_eq!(err.suggestion(), None);
    }

    #[test]
    fn field_term_defect_message() {
        let err = QueryError::new(QueryErrorKind::MalformedFieldTerm {
            term: "\"a\"[]".into(),
            defect: FieldTermDefect::EmptyFieldCode,
        });
        assert!(err.message().contains("the field code is empty"));
        assert!(err.suggestion().unwrap().contains("[TIAB]"));
    }
}
