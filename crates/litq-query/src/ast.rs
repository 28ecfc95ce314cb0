//! Query expression tree.
//!
//! A validated query is a tree of quoted leaves joined by AND, OR and NOT.
//! The canonical string form is rendered from the tree, never assembled by
//! textual substitution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The quote character that delimits a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quote {
    /// `"`
    Double,
    /// `'`
    Single,
}

impl Quote {
    /// Returns the quote for a character, if it is one.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            _ => None,
        }
    }

    /// Returns the quote character.
    pub fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}

/// A quoted search phrase, optionally restricted to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// The text between the quotes.
    pub text: String,
    /// The quote character the user wrote.
    pub quote: Quote,
    /// Field code, e.g. `MeSH` in `"cancer"[MeSH]`.
    pub field: Option<String>,
}

impl Phrase {
    /// Creates a double-quoted phrase without a field.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quote: Quote::Double,
            field: None,
        }
    }

}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quote.as_char();
        write!(f, "{q}{}{q}", self.text)?;
        if let Some(field) = &self.field {
            write!(f, "[{field}]")?;
        }
        Ok(())
    }
}

/// A validated query expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpr {
    /// A quoted phrase or field term.
    Phrase(Phrase),

    /// Conjunction. Members wrapped in [`QueryExpr::Not`] are exclusions.
    And(Vec<Self>),

    /// Disjunction.
    Or(Vec<Self>),

    /// Exclusion. Only appears as a member of an `And`.
    Not(Box<Self>),
}

impl QueryExpr {
    /// Returns the number of nested operator nodes on the deepest path.
    pub fn depth(&self) -> usize {
        match self {
            Self::Phrase(_) => 0,
            Self::And(items) | Self::Or(items) => {
                1 + items.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => inner.depth(),
        }
    }

    /// Returns the parenthesis nesting of the canonical form.
    ///
    /// A leaf at the root is wrapped once; every `And` and `Or` node adds a
    /// level.
    pub fn canonical_depth(&self) -> usize {
        self.depth().max(1)
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Phrase(p) => writeln!(f, "{prefix}{p}"),
            Self::Not(inner) => {
                writeln!(f, "{prefix}NOT")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::And(exprs) => {
                writeln!(f, "{prefix}AND")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(exprs) => {
                writeln!(f, "{prefix}OR")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Renders the canonical, fully parenthesized query string.
    ///
    /// Operators come out as upper-case English and every group is
    /// parenthesized. A single leaf at the root is wrapped in one pair of
    /// parentheses, so `"cancer"` renders as `("cancer")`.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Phrase(p) => format!("({p})"),
            _ => self.render(),
        }
    }

    /// Renders a node without the root leaf wrapping.
    fn render(&self) -> String {
        match self {
            Self::Phrase(p) => p.to_string(),
            Self::Not(inner) => format!("NOT {}", inner.render()),
            Self::Or(items) => {
                let parts: Vec<String> = items.iter().map(Self::render).collect();
                format!("({})", parts.join(" OR "))
            }
            Self::And(items) => {
                let mut out = String::from("(");
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Self::Not(inner) if i > 0 => {
                            out.push_str(" NOT ");
                            out.push_str(&inner.render());
                        }
                        _ => {
                            if i > 0 {
                                out.push_str(" AND ");
                            }
                            out.push_str(&item.render());
                        }
                    }
                }
                out.push(')');
                out
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
