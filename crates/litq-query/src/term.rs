//! Term classification and field-term recognition.
//!
//! An operand is one of three things: a bare word, a quoted phrase, or a
//! field term `"text"[CODE]`. Anything that starts down the quoted path but
//! breaks the field-term pattern is invalid, and the defect says which part of
//! the pattern failed.

use crate::{ast::Quote, error::FieldTermDefect};

/// Length of the shortest possible field term, `"a"[b]`.
pub const MIN_FIELD_TERM_LEN: usize = 6;

/// The classification of a single operand token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermClass {
    /// A bare word with no quoting or brackets.
    Term,
    /// A quoted phrase.
    QuotedPhrase {
        /// Text between the quotes.
        text: String,
        /// The quote character.
        quote: Quote,
    },
    /// A quoted phrase with a field code.
    FieldTerm {
        /// Text between the quotes.
        text: String,
        /// The quote character.
        quote: Quote,
        /// Text between the brackets.
        code: String,
    },
    /// Quote or bracket structure that fits neither form.
    Invalid(FieldTermDefect),
}

/// Returns true for characters allowed in a field code.
fn is_code_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Classifies an operand token.
///
/// The token must not be an operator or a parenthesis; callers check those
/// first. A phrase must close with the same quote character it opened with,
/// and the closing quote must be the last character unless a `[CODE]` suffix
/// follows it.
pub fn classify(token: &str) -> TermClass {
    let Some(quote) = token.chars().next().and_then(Quote::from_char) else {
        if token.contains(['"', '\'', '[', ']']) {
            return TermClass::Invalid(FieldTermDefect::Unquoted);
        }
        return TermClass::Term;
    };

    let rest = &token[1..];
    let Some(close) = rest.find(quote.as_char()) else {
        return TermClass::Invalid(FieldTermDefect::UnterminatedQuote);
    };
    let body = &rest[..close];
    let after = &rest[close + 1..];

    if after.is_empty() {
        if body.is_empty() {
            return TermClass::Invalid(FieldTermDefect::TooShort);
        }
        return TermClass::QuotedPhrase {
            text: body.to_string(),
            quote,
        };
    }

    let Some(bracketed) = after.strip_prefix('[') else {
        return TermClass::Invalid(FieldTermDefect::MissingFieldCode);
    };
    let Some(end) = bracketed.find(']') else {
        return TermClass::Invalid(FieldTermDefect::UnterminatedFieldCode);
    };
    let code = &bracketed[..end];
    let trailing = &bracketed[end + 1..];

    if code.is_empty() {
        return TermClass::Invalid(FieldTermDefect::EmptyFieldCode);
    }
    if !code.chars().all(is_code_char) {
        return TermClass::Invalid(FieldTermDefect::InvalidFieldCode);
    }
    if !trailing.is_empty() {
        return TermClass::Invalid(FieldTermDefect::TrailingText);
    }
    if body.is_empty() || token.len() < MIN_FIELD_TERM_LEN {
        return TermClass::Invalid(FieldTermDefect::TooShort);
    }

    TermClass::FieldTerm {
        text: body.to_string(),
        quote,
        code: code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand for an invalid classification.
    fn invalid(defect: FieldTermDefect) -> TermClass {
        TermClass::Invalid(defect)
    }

    #[test]
    fn minimal_field_term() {
        assert_eq!(
            classify("\"a\"[b]"),
            TermClass::FieldTerm {
                text: "a".into(),
                quote: Quote::Double,
                code: "b".into()
            }
        );
    }

    #[test]
    fn field_term_with_single_quotes() {
        assert_eq!(
            classify("'breast cancer'[MeSH_Major1]"),
            TermClass::FieldTerm {
                text: "breast cancer".into(),
                quote: Quote::Single,
                code: "MeSH_Major1".into()
            }
        );
    }

    #[test]
    fn field_term_defects() {
        assert_eq!(classify("\"a\"[]"), invalid(FieldTermDefect::EmptyFieldCode));
        assert_eq!(classify("a[b]"), invalid(FieldTermDefect::Unquoted));
        assert_eq!(classify("\"a\"[b]x"), invalid(FieldTermDefect::TrailingText));
        assert_eq!(classify("\"a'[b]"), invalid(FieldTermDefect::UnterminatedQuote));
        assert_eq!(classify("\"a\"[b"), invalid(FieldTermDefect::UnterminatedFieldCode));
        assert_eq!(classify("\"a\"x"), invalid(FieldTermDefect::MissingFieldCode));
        assert_eq!(
            classify("\"a\"[MeSH Terms]"),
            invalid(FieldTermDefect::InvalidFieldCode)
        );
        assert_eq!(classify("\"\"[b]"), invalid(FieldTermDefect::TooShort));
    }

    #[test]
    fn quoted_phrases() {
        assert_eq!(
            classify("\"heart attack\""),
            TermClass::QuotedPhrase {
                text: "heart attack".into(),
                quote: Quote::Double
            }
        );
        assert_eq!(
            classify("\"Crohn's\""),
            TermClass::QuotedPhrase {
                text: "Crohn's".into(),
                quote: Quote::Double
            }
        );
        assert_eq!(classify("\"\""), invalid(FieldTermDefect::TooShort));
    }

    #[test]
    fn bare_terms() {
        assert_eq!(classify("cancer"), TermClass::Term);
        assert_eq!(classify("2015:2025"), TermClass::Term);
        assert_eq!(classify("TERM_1"), TermClass::Term);
    }

    #[test]
    fn bare_term_with_quote_inside() {
        assert_eq!(classify("Crohn's"), invalid(FieldTermDefect::Unquoted));
    }
}
