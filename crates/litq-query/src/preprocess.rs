//! Comment stripping and format detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::OperatorTable;

/// The surface syntax a query is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryFormat {
    /// One expression, possibly wrapped over several lines.
    SingleLine,
    /// Content lines alternating with lines holding a single operator.
    MultiLine,
}

impl fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleLine => write!(f, "SINGLE_LINE"),
            Self::MultiLine => write!(f, "MULTI_LINE"),
        }
    }
}

/// Cuts a line at the first `#` that is outside quotes and brackets.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut in_bracket = false;
    for (i, ch) in line.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
        } else if in_bracket {
            if ch == ']' {
                in_bracket = false;
            }
        } else {
            match ch {
                '"' | '\'' => quote = Some(ch),
                '[' => in_bracket = true,
                '#' => return &line[..i],
                _ => {}
            }
        }
    }
    line
}

/// Strips comments, trims every line and drops lines left blank.
pub fn preprocess(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| strip_comment(line).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true if every odd-indexed line (2nd, 4th, ...) is an operator.
///
/// Blocks of two or more lines with this shape are meant as multi-line
/// queries even when they break the multi-line counting rules.
pub fn is_operator_layout<S: AsRef<str>>(lines: &[S], table: &OperatorTable) -> bool {
    lines.len() >= 2
        && lines
            .iter()
            .skip(1)
            .step_by(2)
            .all(|line| table.is_operator(line.as_ref().trim()))
}

/// Chooses the grammar for a preprocessed query.
///
/// A query is [`QueryFormat::MultiLine`] when it has at least three lines, an
/// odd line count, and an operator on every odd-indexed line. Anything else
/// is [`QueryFormat::SingleLine`].
pub fn detect_format<S: AsRef<str>>(lines: &[S], table: &OperatorTable) -> QueryFormat {
    if lines.len() >= 3 && lines.len() % 2 == 1 && is_operator_layout(lines, table) {
        QueryFormat::MultiLine
    } else {
        QueryFormat::SingleLine
    }
}
