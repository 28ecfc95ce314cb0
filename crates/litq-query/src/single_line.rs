//! Single-line validation and unfolding.
//!
//! A line is checked in a fixed order and the first violation wins:
//!
//! 1. whitespace is collapsed and the token cap applied
//! 2. every operand must be a quoted phrase or field term
//! 3. parentheses must balance within the depth cap
//! 4. AND and OR may not share the top level
//! 5. groups are unfolded innermost-first, leftmost-first; each group is
//!    validated and built before the level that contains it
//! 6. the top level is validated and built last

use std::ops::Range;

use tracing::debug;

use crate::{
    ast::QueryExpr,
    error::{Limit, QueryError, QueryErrorKind},
    level::{Item, build_level, check_mixing},
    lexer::{Token, tokenize},
    operator::Operator,
    parser::QueryParser,
};

/// The result of parsing one line.
#[derive(Debug, Clone)]
pub struct ParsedLine {
    /// The line after whitespace normalization.
    pub normalized: String,
    /// The expression tree.
    pub expr: QueryExpr,
    /// Tokens in source order.
    pub tokens: Vec<Token>,
    /// Byte ranges of each parenthesized group in discovery order.
    pub groups: Vec<Range<usize>>,
}

impl ParsedLine {
    /// Returns the source text of each group in discovery order.
    pub fn group_texts(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter_map(|range| self.normalized.get(range.clone()))
            .map(str::to_string)
            .collect()
    }
}

/// An open group on the unfolding stack.
struct Frame {
    /// Items collected so far.
    items: Vec<Item>,
    /// Byte position of the opening parenthesis.
    open: usize,
}

impl Frame {
    /// Creates an empty frame.
    fn new(open: usize) -> Self {
        Self {
            items: Vec::new(),
            open,
        }
    }
}

/// Parses a single line of query text.
pub fn parse_line(raw: &str, parser: &QueryParser) -> Result<ParsedLine, QueryError> {
    let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.is_empty() {
        return Err(QueryError::new(QueryErrorKind::EmptyQuery));
    }

    let lexemes = tokenize(&line);
    let max_tokens = parser.limits().max_tokens;
    if lexemes.len() > max_tokens {
        return Err(QueryError::new(QueryErrorKind::LimitExceeded {
            limit: Limit::Tokens,
            max: max_tokens,
        })
        .with_query(line));
    }

    let mut tokens = Vec::with_capacity(lexemes.len());
    for lexeme in &lexemes {
        let token = Token::from_lexeme(lexeme, parser.table())
            .map_err(|kind| QueryError::at(kind, lexeme.position, &line))?;
        if let Token::Term { text } = &token {
            return Err(QueryError::at(
                QueryErrorKind::InvalidOperand { term: text.clone() },
                lexeme.position,
                &line,
            ));
        }
        tokens.push((token, lexeme.position));
    }

    check_balance(&tokens, parser.limits().max_depth, &line)?;
    check_mixing(top_level_operators(&tokens), parser.policy(), &line)?;

    let (expr, groups) = unfold(&tokens, parser, &line)?;
    debug!(groups = groups.len(), "unfolded parenthesized groups");

    Ok(ParsedLine {
        normalized: line,
        expr,
        tokens: tokens.into_iter().map(|(token, _)| token).collect(),
        groups,
    })
}

/// Returns true if the parentheses in `line` pair up, ignoring quoted and
/// bracketed text.
pub fn is_balanced(line: &str) -> bool {
    let mut depth = 0usize;
    for lexeme in tokenize(line) {
        match lexeme.text.as_str() {
            "(" => depth += 1,
            ")" => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Checks that parentheses pair up and do not nest deeper than `max_depth`.
fn check_balance(tokens: &[(Token, usize)], max_depth: usize, line: &str) -> Result<(), QueryError> {
    let mut open = Vec::new();
    for (token, pos) in tokens {
        match token {
            Token::OpenParen => {
                open.push(*pos);
                if open.len() > max_depth {
                    return Err(QueryError::at(
                        QueryErrorKind::LimitExceeded {
                            limit: Limit::Depth,
                            max: max_depth,
                        },
                        *pos,
                        line,
                    ));
                }
            }
            Token::CloseParen => {
                if open.pop().is_none() {
                    return Err(QueryError::at(
                        QueryErrorKind::UnbalancedParentheses,
                        *pos,
                        line,
                    ));
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(pos) => Err(QueryError::at(
            QueryErrorKind::UnbalancedParentheses,
            *pos,
            line,
        )),
        None => Ok(()),
    }
}

/// Returns the operators outside any parentheses.
fn top_level_operators(tokens: &[(Token, usize)]) -> Vec<(Operator, usize)> {
    let mut depth = 0usize;
    let mut ops = Vec::new();
    for (token, pos) in tokens {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => depth = depth.saturating_sub(1),
            Token::Operator { op } if depth == 0 => ops.push((*op, *pos)),
            _ => {}
        }
    }
    ops
}

/// Unfolds groups innermost-first and builds the tree.
///
/// A group is complete when its closing parenthesis is reached, which is
/// exactly innermost-first, leftmost-first order. Each completed group is
/// built immediately and becomes a single operand of the enclosing level.
fn unfold(
    tokens: &[(Token, usize)],
    parser: &QueryParser,
    line: &str,
) -> Result<(QueryExpr, Vec<Range<usize>>), QueryError> {
    let unbalanced = |pos| QueryError::at(QueryErrorKind::UnbalancedParentheses, pos, line);

    let mut stack = vec![Frame::new(0)];
    let mut groups = Vec::new();

    for (token, pos) in tokens {
        let pos = *pos;
        match token {
            Token::OpenParen => stack.push(Frame::new(pos)),
            Token::CloseParen => {
                if stack.len() < 2 {
                    return Err(unbalanced(pos));
                }
                let Some(frame) = stack.pop() else {
                    return Err(unbalanced(pos));
                };
                groups.push(frame.open..pos + 1);
                let expr = build_level(frame.items, frame.open, parser.policy(), line)?;
                let Some(parent) = stack.last_mut() else {
                    return Err(unbalanced(pos));
                };
                parent.items.push(Item::Operand(expr, frame.open));
            }
            Token::Operator { op } => {
                if let Some(top) = stack.last_mut() {
                    top.items.push(Item::Op(*op, pos));
                }
            }
            Token::Term { text } => {
                return Err(QueryError::at(
                    QueryErrorKind::InvalidOperand { term: text.clone() },
                    pos,
                    line,
                ));
            }
            Token::QuotedPhrase { .. } | Token::FieldTerm { .. } => {
                if let (Some(top), Some(phrase)) = (stack.last_mut(), token.to_phrase()) {
                    top.items.push(Item::Operand(QueryExpr::Phrase(phrase), pos));
                }
            }
        }
    }

    let Some(top) = stack.pop() else {
        return Err(unbalanced(line.len()));
    };
    if !stack.is_empty() {
        return Err(unbalanced(top.open));
    }
    let expr = build_level(top.items, 0, parser.policy(), line)?;
    Ok((expr, groups))
}
