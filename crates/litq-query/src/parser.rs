//! Query parser entry points.
//!
//! A [`QueryParser`] bundles everything that varies between deployments: the
//! operator table, the mixing policy and the input limits. It holds no mutable
//! state, so one parser can serve any number of callers concurrently.
//!
//! Parsing follows one path per call:
//!
//! 1. comments and blank lines are removed
//! 2. the format is detected from the remaining lines
//! 3. multi-line blocks go to the multi-line validator, everything else is
//!    joined with single spaces and validated as one line
//! 4. the tree is checked against the depth limit
//! 5. the canonical string is rendered from the resulting tree

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ast::QueryExpr,
    error::{Limit, QueryError, QueryErrorKind},
    lexer::Token,
    multi_line::parse_lines,
    operator::{Operator, OperatorTable},
    preprocess::{QueryFormat, detect_format, is_operator_layout, preprocess},
    single_line::parse_line,
};

/// Which operators may share one nesting level without parentheses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixingPolicy {
    /// AND and OR may not mix; NOT joins next to either.
    #[default]
    Permissive,
    /// No two distinct operators may mix, NOT included.
    Strict,
}

impl fmt::Display for MixingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for MixingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown mixing policy: {other}")),
        }
    }
}

/// Caps on input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum parenthesis nesting depth.
    pub max_depth: usize,
    /// Maximum number of tokens in one line.
    pub max_tokens: usize,
}

impl Limits {
    /// Default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 32;
    /// Default maximum token count.
    pub const DEFAULT_MAX_TOKENS: usize = 2000;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }
}

/// A configured query parser.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    /// Operator spellings.
    table: OperatorTable,
    /// Operator mixing rule.
    policy: MixingPolicy,
    /// Input caps.
    limits: Limits,
}

impl QueryParser {
    /// Creates a parser from its parts.
    pub fn new(table: OperatorTable, policy: MixingPolicy, limits: Limits) -> Self {
        Self {
            table,
            policy,
            limits,
        }
    }

    /// Returns this parser with a different operator table.
    #[must_use]
    pub fn with_table(mut self, table: OperatorTable) -> Self {
        self.table = table;
        self
    }

    /// Returns this parser with a different mixing policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MixingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns this parser with different limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The operator table.
    pub fn table(&self) -> &OperatorTable {
        &self.table
    }

    /// The mixing policy.
    pub fn policy(&self) -> MixingPolicy {
        self.policy
    }

    /// The input limits.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Parses raw query text in either format.
    ///
    /// Validation stops at the first problem found and returns it.
    pub fn parse(&self, text: &str) -> Result<ParsedQuery, QueryError> {
        let lines = preprocess(text);
        if lines.is_empty() {
            return Err(QueryError::new(QueryErrorKind::EmptyQuery));
        }

        let format = detect_format(&lines, &self.table);
        debug!(%format, lines = lines.len(), "detected query format");

        if format == QueryFormat::MultiLine || is_operator_layout(&lines, &self.table) {
            self.parse_multi_line(&lines)
        } else {
            self.parse_single_line(&lines.join(" "))
        }
    }

    /// Parses one line as a single-line query.
    pub fn parse_single_line(&self, line: &str) -> Result<ParsedQuery, QueryError> {
        let parsed = parse_line(line, self)?;
        self.check_depth(&parsed.expr)
            .map_err(|e| e.with_query(parsed.normalized.clone()))?;
        let groups = parsed.group_texts();
        Ok(ParsedQuery::new(
            QueryFormat::SingleLine,
            parsed.expr,
            parsed.tokens,
            groups,
        ))
    }

    /// Parses lines as a multi-line query.
    pub fn parse_multi_line<S: AsRef<str>>(&self, lines: &[S]) -> Result<ParsedQuery, QueryError> {
        let block = parse_lines(lines, self)?;
        self.check_depth(&block.expr)?;
        Ok(ParsedQuery::new(
            QueryFormat::MultiLine,
            block.expr,
            block.tokens,
            block.groups,
        ))
    }

    /// Rejects a tree whose canonical form nests deeper than the limit.
    ///
    /// Alternating OR and NOT joins nest in the tree without any
    /// parentheses in the input, so the limit applies to both.
    fn check_depth(&self, expr: &QueryExpr) -> Result<(), QueryError> {
        let max = self.limits.max_depth;
        if expr.canonical_depth() > max {
            return Err(QueryError::new(QueryErrorKind::LimitExceeded {
                limit: Limit::Depth,
                max,
            }));
        }
        Ok(())
    }
}

/// A successfully validated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    /// The detected surface format.
    pub format: QueryFormat,
    /// The canonical, fully parenthesized expression.
    pub canonical: String,
    /// The expression tree.
    #[serde(skip)]
    pub expr: QueryExpr,
    /// Tokens in source order.
    pub tokens: Vec<Token>,
    /// Source text of each parenthesized group, innermost first.
    pub groups: Vec<String>,
}

impl ParsedQuery {
    /// Assembles a result and renders its canonical form.
    fn new(format: QueryFormat, expr: QueryExpr, tokens: Vec<Token>, groups: Vec<String>) -> Self {
        let canonical = expr.to_query_string();
        debug!(%canonical, "parsed query");
        Self {
            format,
            canonical,
            expr,
            tokens,
            groups,
        }
    }

    /// Counts the parts of the query.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            groups: self.groups.len(),
            depth: self.expr.depth(),
            ..Summary::default()
        };
        let mut fields = BTreeSet::new();
        for token in &self.tokens {
            match token {
                Token::QuotedPhrase { .. } => summary.phrases += 1,
                Token::FieldTerm { code, .. } => {
                    summary.field_terms += 1;
                    fields.insert(code.clone());
                }
                Token::Operator { op } => match op {
                    Operator::And => summary.and += 1,
                    Operator::Or => summary.or += 1,
                    Operator::Not => summary.not += 1,
                },
                Token::Term { .. } | Token::OpenParen | Token::CloseParen => {}
            }
        }
        summary.fields = fields.into_iter().collect();
        summary
    }
}

/// Counts of the parts of a parsed query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Quoted phrases without a field code.
    pub phrases: usize,
    /// Field-qualified terms.
    pub field_terms: usize,
    /// Distinct field codes, sorted.
    pub fields: Vec<String>,
    /// AND operators.
    pub and: usize,
    /// OR operators.
    pub or: usize,
    /// NOT operators.
    pub not: usize,
    /// Parenthesized groups.
    pub groups: usize,
    /// Nesting depth of the expression tree.
    pub depth: usize,
}

/// Parses a query with the default parser.
pub fn parse(text: &str) -> Result<ParsedQuery, QueryError> {
    QueryParser::default().parse(text)
}
