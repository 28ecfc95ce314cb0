//! Grammar of a single nesting level.
//!
//! Inside one pair of parentheses (or at the top level) a query must read
//! `operand (operator operand)*`. Once the placement is right, the mixing
//! policy decides which operators may share the level, and the operands are
//! folded left into an expression.

use crate::{
    ast::QueryExpr,
    error::{Placement, QueryError, QueryErrorKind},
    operator::Operator,
    parser::MixingPolicy,
};

/// One element of a level: an operand or a joining operator, with its byte
/// position in the line.
#[derive(Debug, Clone)]
pub enum Item {
    /// A phrase or an already-built group.
    Operand(QueryExpr, usize),
    /// An operator.
    Op(Operator, usize),
}

/// Rejects operators that may not share a level under `policy`.
///
/// Under [`MixingPolicy::Permissive`] NOT joins freely next to AND or OR and
/// only AND with OR is an error. Under [`MixingPolicy::Strict`] any two
/// distinct operators conflict.
pub fn check_mixing(
    ops: impl IntoIterator<Item = (Operator, usize)>,
    policy: MixingPolicy,
    line: &str,
) -> Result<(), QueryError> {
    let mut first: Option<Operator> = None;
    for (op, pos) in ops {
        if policy == MixingPolicy::Permissive && op == Operator::Not {
            continue;
        }
        match first {
            None => first = Some(op),
            Some(seen) if seen != op => {
                return Err(QueryError::at(
                    QueryErrorKind::MixedOperators {
                        first: seen,
                        second: op,
                    },
                    pos,
                    line,
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Validates one level and folds it into an expression.
///
/// `start` is the position reported for an empty level. A level holding a
/// single operand yields that operand unchanged, so redundant parentheses
/// disappear.
pub fn build_level(
    items: Vec<Item>,
    start: usize,
    policy: MixingPolicy,
    line: &str,
) -> Result<QueryExpr, QueryError> {
    let misplaced = |placement, pos| {
        QueryError::at(QueryErrorKind::MisplacedOperator(placement), pos, line)
    };

    let mut iter = items.into_iter();
    let first = match iter.next() {
        None => return Err(misplaced(Placement::EmptyGroup, start)),
        Some(Item::Op(op, pos)) => return Err(misplaced(Placement::Leading(op), pos)),
        Some(Item::Operand(expr, _)) => expr,
    };

    let mut rest = Vec::new();
    while let Some(item) = iter.next() {
        let (op, pos) = match item {
            Item::Operand(_, pos) => return Err(misplaced(Placement::MissingOperator, pos)),
            Item::Op(op, pos) => (op, pos),
        };
        match iter.next() {
            None => return Err(misplaced(Placement::Trailing(op), pos)),
            Some(Item::Op(next, next_pos)) => {
                return Err(misplaced(Placement::Adjacent(op, next), next_pos));
            }
            Some(Item::Operand(expr, _)) => rest.push((op, pos, expr)),
        }
    }

    check_mixing(rest.iter().map(|(op, pos, _)| (*op, *pos)), policy, line)?;
    Ok(fold(first, rest.into_iter().map(|(op, _, expr)| (op, expr))))
}

/// Left-folds operands joined by operators.
///
/// Consecutive AND and NOT joins extend one `And` node, with NOT-joined
/// operands wrapped in `Not`. Consecutive OR joins extend one `Or` node. A
/// node built by an earlier join is only extended by a join of the same
/// family, so `a OR b NOT c` becomes `(a OR b) NOT c`. Operands that arrive
/// already built, such as parenthesized groups, are never extended.
pub fn fold(first: QueryExpr, rest: impl IntoIterator<Item = (Operator, QueryExpr)>) -> QueryExpr {
    let mut acc = first;
    let mut built = false;
    for (op, rhs) in rest {
        acc = match (op, acc) {
            (Operator::Or, QueryExpr::Or(mut items)) if built => {
                items.push(rhs);
                QueryExpr::Or(items)
            }
            (Operator::Or, lhs) => QueryExpr::Or(vec![lhs, rhs]),
            (op, QueryExpr::And(mut items)) if built => {
                items.push(conjunct(op, rhs));
                QueryExpr::And(items)
            }
            (op, lhs) => QueryExpr::And(vec![lhs, conjunct(op, rhs)]),
        };
        built = true;
    }
    acc
}

/// Wraps the right-hand side of a NOT join.
fn conjunct(op: Operator, rhs: QueryExpr) -> QueryExpr {
    if op == Operator::Not {
        QueryExpr::Not(Box::new(rhs))
    } else {
        rhs
    }
}
