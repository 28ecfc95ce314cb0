//! Multi-line validation.
//!
//! A multi-line query alternates content lines with operator lines:
//!
//! ```text
//! ("cancer"[MeSH] OR "tumor"[TIAB])
//! AND
//! "2015:2025"[pdat]
//! ```
//!
//! Every content line is a complete single-line query on its own, and every
//! operator line carries the same operator. Lines are numbered from 1 in
//! diagnostics.

use crate::{
    ast::QueryExpr,
    error::{MultilineDefect, QueryError},
    level::fold,
    lexer::Token,
    operator::Operator,
    parser::QueryParser,
    single_line::{is_balanced, parse_line},
};

/// The result of parsing a multi-line block.
#[derive(Debug, Clone)]
pub struct ParsedBlock {
    /// The combined expression tree.
    pub expr: QueryExpr,
    /// Tokens of all lines in source order.
    pub tokens: Vec<Token>,
    /// Source text of each parenthesized group, line by line.
    pub groups: Vec<String>,
}

/// Parses content lines joined by operator lines.
pub fn parse_lines<S: AsRef<str>>(lines: &[S], parser: &QueryParser) -> Result<ParsedBlock, QueryError> {
    let lines: Vec<&str> = lines.iter().map(|l| l.as_ref().trim()).collect();

    let count = lines.len();
    if count < 3 {
        return Err(QueryError::multiline(MultilineDefect::TooFewLines { count }));
    }
    if count % 2 == 0 {
        return Err(QueryError::multiline(MultilineDefect::EvenLineCount { count }));
    }

    for (i, line) in lines.iter().enumerate().step_by(2) {
        if !is_balanced(line) {
            return Err(
                QueryError::multiline(MultilineDefect::CrossLineParentheses { line: i + 1 })
                    .with_query(*line),
            );
        }
    }

    let op = shared_operator(&lines, parser)?;

    let mut tokens = Vec::new();
    let mut groups = Vec::new();
    let mut operands = Vec::with_capacity(count / 2 + 1);
    for (i, line) in lines.iter().enumerate() {
        if i % 2 == 1 {
            tokens.push(Token::Operator { op });
            continue;
        }
        let parsed = parse_line(line, parser).map_err(|e| e.at_line(i + 1))?;
        groups.extend(parsed.group_texts());
        tokens.extend(parsed.tokens);
        operands.push(parsed.expr);
    }

    let mut operands = operands.into_iter();
    let Some(first) = operands.next() else {
        return Err(QueryError::multiline(MultilineDefect::TooFewLines { count }));
    };
    let expr = fold(first, operands.map(|expr| (op, expr)));

    Ok(ParsedBlock {
        expr,
        tokens,
        groups,
    })
}

/// Returns the operator shared by every operator line.
fn shared_operator(lines: &[&str], parser: &QueryParser) -> Result<Operator, QueryError> {
    let mut shared: Option<Operator> = None;
    for (i, line) in lines.iter().enumerate().skip(1).step_by(2) {
        let Some(op) = parser.table().normalize(line) else {
            return Err(QueryError::multiline(MultilineDefect::ExpectedOperator {
                line: i + 1,
                found: (*line).to_string(),
            }));
        };
        match shared {
            None => shared = Some(op),
            Some(expected) if expected != op => {
                return Err(QueryError::multiline(MultilineDefect::MixedOperators {
                    line: i + 1,
                    expected,
                    found: op,
                })
                .with_query(*line));
            }
            Some(_) => {}
        }
    }
    shared.ok_or_else(|| {
        QueryError::multiline(MultilineDefect::TooFewLines {
            count: lines.len(),
        })
    })
}
