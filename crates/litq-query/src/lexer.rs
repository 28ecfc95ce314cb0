//! Query lexer (tokenizer).
//!
//! Splits one line of query text into lexemes in a single left-to-right scan,
//! then turns lexemes into typed [`Token`]s. Whitespace and parentheses
//! separate lexemes except inside a quoted span or a bracket span. An
//! unterminated span simply runs to the end of the input; the term classifier
//! reports it later.

use std::{fmt, iter::Peekable, str::CharIndices};

use serde::Serialize;

use crate::{
    ast::{Phrase, Quote},
    error::QueryErrorKind,
    operator::{Operator, OperatorTable},
    term::{TermClass, classify},
};

/// A raw slice of input text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The lexeme text, delimiters included.
    pub text: String,
    /// Byte offset of the first character.
    pub position: usize,
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// A bare, unquoted word.
    Term {
        /// The word.
        text: String,
    },

    /// A quoted phrase (quotes stripped).
    QuotedPhrase {
        /// The text between the quotes.
        text: String,
        /// The quote character used.
        quote: Quote,
    },

    /// A quoted phrase qualified with a field code, e.g. `"cancer"[MeSH]`.
    FieldTerm {
        /// The text between the quotes.
        text: String,
        /// The quote character used.
        quote: Quote,
        /// The code between the brackets.
        code: String,
    },

    /// A boolean operator in any of its spellings.
    Operator {
        /// The canonical operator.
        op: Operator,
    },

    /// Left parenthesis.
    OpenParen,

    /// Right parenthesis.
    CloseParen,
}

impl Token {
    /// Converts a lexeme into a typed token.
    ///
    /// Bare words become [`Token::Term`]; whether a bare word is acceptable is
    /// up to the grammar. Quote or bracket structure that does not form a
    /// valid phrase or field term is a [`QueryErrorKind::MalformedFieldTerm`].
    pub fn from_lexeme(lexeme: &Lexeme, table: &OperatorTable) -> Result<Self, QueryErrorKind> {
        match lexeme.text.as_str() {
            "(" => return Ok(Self::OpenParen),
            ")" => return Ok(Self::CloseParen),
            _ => {}
        }
        if let Some(op) = table.normalize(&lexeme.text) {
            return Ok(Self::Operator { op });
        }
        match classify(&lexeme.text) {
            TermClass::Term => Ok(Self::Term {
                text: lexeme.text.clone(),
            }),
            TermClass::QuotedPhrase { text, quote } => Ok(Self::QuotedPhrase { text, quote }),
            TermClass::FieldTerm { text, quote, code } => {
                Ok(Self::FieldTerm { text, quote, code })
            }
            TermClass::Invalid(defect) => Err(QueryErrorKind::MalformedFieldTerm {
                term: lexeme.text.clone(),
                defect,
            }),
        }
    }

    /// Returns the leaf phrase for quoted tokens.
    pub fn to_phrase(&self) -> Option<Phrase> {
        match self {
            Self::QuotedPhrase { text, quote } => Some(Phrase {
                text: text.clone(),
                quote: *quote,
                field: None,
            }),
            Self::FieldTerm { text, quote, code } => Some(Phrase {
                text: text.clone(),
                quote: *quote,
                field: Some(code.clone()),
            }),
            _ => None,
        }
    }

    /// A short name for the token's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Term { .. } => "term",
            Self::QuotedPhrase { .. } => "phrase",
            Self::FieldTerm { .. } => "field term",
            Self::Operator { .. } => "operator",
            Self::OpenParen => "open paren",
            Self::CloseParen => "close paren",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term { text } => write!(f, "{text}"),
            Self::QuotedPhrase { .. } | Self::FieldTerm { .. } => match self.to_phrase() {
                Some(phrase) => write!(f, "{phrase}"),
                None => Ok(()),
            },
            Self::Operator { op } => write!(f, "{op}"),
            Self::OpenParen => write!(f, "("),
            Self::CloseParen => write!(f, ")"),
        }
    }
}

/// Splits a line into lexemes.
struct Lexer<'a> {
    /// Characters with byte offsets and one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
        }
    }

    /// Lexes the entire input.
    fn tokenize(mut self) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();
        while let Some(lexeme) = self.next_lexeme() {
            lexemes.push(lexeme);
        }
        lexemes
    }

    /// Returns the next lexeme, or None at end of input.
    fn next_lexeme(&mut self) -> Option<Lexeme> {
        self.skip_whitespace();

        let &(position, ch) = self.chars.peek()?;
        if ch == '(' || ch == ')' {
            self.chars.next();
            return Some(Lexeme {
                text: ch.to_string(),
                position,
            });
        }

        let mut text = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            match ch {
                '(' | ')' => break,
                c if c.is_whitespace() => break,
                '"' | '\'' => self.read_span(ch, ch, &mut text),
                '[' => self.read_span('[', ']', &mut text),
                _ => {
                    text.push(ch);
                    self.chars.next();
                }
            }
        }
        Some(Lexeme { text, position })
    }

    /// Consumes a span from `open` through the matching `close`, or to end of
    /// input if `close` never appears.
    fn read_span(&mut self, open: char, close: char, text: &mut String) {
        self.chars.next();
        text.push(open);
        for (_, ch) in self.chars.by_ref() {
            text.push(ch);
            if ch == close {
                break;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
    }
}

/// Splits a line of query text into lexemes.
pub fn tokenize(input: &str) -> Vec<Lexeme> {
    Lexer::new(input).tokenize()
}
