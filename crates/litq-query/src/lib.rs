//! Boolean query validation for literature databases.
//!
//! This crate checks and normalizes search expressions of the kind used with
//! PubMed and similar services:
//!
//! - **Phrases**: `"heart attack"` - every operand is quoted
//! - **Field terms**: `"cancer"[MeSH]` - a phrase restricted to one field
//! - **Operators**: `AND`, `OR`, `NOT`, with German synonyms (`UND`, `ODER`, `NICHT`, ...)
//! - **Grouping**: `("a" OR "b") AND "c"` - AND and OR never share a level ungrouped
//! - **Multi-line**: content lines alternating with operator lines
//! - **Comments**: `#` to end of line, outside quotes and brackets
//!
//! A successful parse yields an explicit expression tree and its canonical,
//! fully parenthesized string form.
//!
//! # Example
//!
//! ```
//! use litq_query::{QueryFormat, parse};
//!
//! let parsed = parse("(\"cancer\"[MeSH] oder \"tumor\"[TIAB]) und \"2015:2025\"[pdat]").unwrap();
//! assert_eq!(parsed.format, QueryFormat::SingleLine);
//! assert_eq!(
//!     parsed.canonical,
//!     "((\"cancer\"[MeSH] OR \"tumor\"[TIAB]) AND \"2015:2025\"[pdat])"
//! );
//!
//! let err = parse("\"x\" AND \"y\" OR \"z\"").unwrap_err();
//! assert!(err.message().contains("cannot mix AND and OR"));
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod level;
mod lexer;
mod multi_line;
mod operator;
mod parser;
mod preprocess;
mod single_line;
mod term;

pub use ast::{Phrase, QueryExpr, Quote};
pub use error::{FieldTermDefect, Limit, MultilineDefect, Placement, QueryError, QueryErrorKind};
pub use lexer::{Lexeme, Token, tokenize};
pub use operator::{MAX_SYNONYM_LEN, Operator, OperatorTable, is_matchable_synonym};
pub use parser::{Limits, MixingPolicy, ParsedQuery, QueryParser, Summary, parse};
pub use preprocess::{QueryFormat, detect_format, is_operator_layout, preprocess, strip_comment};
pub use term::{MIN_FIELD_TERM_LEN, TermClass, classify};
