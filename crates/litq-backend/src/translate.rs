//! Dialect translation of canonical expressions.
//!
//! Translation works token by token over the query tokenizer and the tokens
//! are joined back with single spaces (none inside parentheses). Quoted text
//! is kept, except that tag stripping drops bracket characters inside it. The input is usually a canonical expression but any
//! query text is accepted.

use litq_query::{Lexeme, tokenize};
use tracing::{debug, warn};

use crate::{
    backend::{Dialect, Target},
    compile::CompileWarning,
};

/// Translates an expression into `dialect`.
pub fn translate(canonical: &str, dialect: Dialect) -> String {
    let lexemes = tokenize(canonical);
    let parts = match dialect {
        Dialect::TagNative => lexemes.into_iter().map(|l| l.text).collect(),
        Dialect::YearRange => rewrite_year_ranges(&lexemes),
        Dialect::TagStripping => lexemes
            .iter()
            .map(|l| strip_tags(&l.text))
            .filter(|t| !t.is_empty())
            .collect(),
    };
    let out = join(&parts);
    debug!(%dialect, query = %out, "translated expression");
    out
}

/// Translates an expression for a target that may be unknown.
///
/// An unknown target is not an error: the expression comes back with only
/// its whitespace normalized, together with a warning.
pub fn translate_for(canonical: &str, target: &Target) -> (String, Option<CompileWarning>) {
    match target {
        Target::Known(backend) => (translate(canonical, backend.dialect()), None),
        Target::Unknown(name) => {
            warn!(backend = %name, "unknown backend, passing expression through unchanged");
            (
                translate(canonical, Dialect::TagNative),
                Some(CompileWarning::UnknownBackend { name: name.clone() }),
            )
        }
    }
}

/// Joins tokens with single spaces, with no space after `(` or before `)`.
fn join(parts: &[String]) -> String {
    let mut out = String::new();
    let mut after_open = true;
    for part in parts {
        if !after_open && part != ")" {
            out.push(' ');
        }
        out.push_str(part);
        after_open = part == "(";
    }
    out
}

/// Returns the quoted body of `text`, or `text` itself if it is not quoted.
fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close && text.len() >= 2 => {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

/// Returns true for a four-digit year.
fn is_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Recognizes `YYYY:YYYY[pdat]`, quoted or bare, and returns the two years.
fn year_range(text: &str) -> Option<(&str, &str)> {
    let open = text.rfind('[')?;
    let code = text[open + 1..].strip_suffix(']')?;
    if !code.eq_ignore_ascii_case("pdat") {
        return None;
    }
    let (from, to) = unquote(&text[..open]).split_once(':')?;
    (is_year(from) && is_year(to)).then_some((from, to))
}

/// Rewrites every `[pdat]` year range as `PUB_YEAR:(from TO to)`.
///
/// A range that is the only content of a pair of parentheses replaces the
/// pair, since the range syntax carries its own.
fn rewrite_year_ranges(lexemes: &[Lexeme]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lexemes.len());
    let mut i = 0;
    while i < lexemes.len() {
        let text = &lexemes[i].text;
        let Some((from, to)) = year_range(text) else {
            out.push(text.clone());
            i += 1;
            continue;
        };
        let range = format!("PUB_YEAR:({from} TO {to})");
        let enclosed = out.last().is_some_and(|t| t == "(")
            && lexemes.get(i + 1).is_some_and(|l| l.text == ")");
        if enclosed {
            out.pop();
            i += 1;
        }
        out.push(range);
        i += 1;
    }
    out
}

/// Removes every `[...]` span that is outside quotes.
///
/// Inside a quoted phrase only the bracket characters are dropped, so the
/// result never contains `[` and the phrase keeps its words.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut in_bracket = false;
    for ch in text.chars() {
        if in_bracket {
            in_bracket = ch != ']';
            continue;
        }
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            if !matches!(ch, '[' | ']') {
                out.push(ch);
            }
            continue;
        }
        match ch {
            '[' => in_bracket = true,
            '"' | '\'' => {
                quote = Some(ch);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;

    #[test]
    fn tag_native_only_normalizes_whitespace() {
        assert_eq!(
            translate("(  \"cancer\"[MeSH]   OR \"tumor\"[TIAB] )", Dialect::TagNative),
            "(\"cancer\"[MeSH] OR \"tumor\"[TIAB])"
        );
        let canonical = "((\"a\"[ti] OR \"b\") AND \"c d\")";
        assert_eq!(translate(canonical, Dialect::TagNative), canonical);
    }

    #[test]
    fn year_range_rewrite() {
        let out = translate("(cancer) AND (2015:2025[pdat])", Dialect::YearRange);
        assert_eq!(out, "(cancer) AND PUB_YEAR:(2015 TO 2025)");
        assert!(!out.contains("[pdat]"));
    }

    #[test]
    fn year_range_rewrite_in_canonical_form() {
        let out = translate(
            "((\"cancer\"[MeSH] OR \"tumor\"[TIAB]) AND \"2015:2025\"[PDAT])",
            Dialect::YearRange,
        );
        assert_eq!(
            out,
            "((\"cancer\"[MeSH] OR \"tumor\"[TIAB]) AND PUB_YEAR:(2015 TO 2025))"
        );
    }

    #[test]
    fn year_range_requires_two_years() {
        for text in ["\"2015\"[pdat]", "\"15:25\"[pdat]", "\"2015:2025\"[dp]", "\"a:b\"[pdat]"] {
            assert_eq!(translate(text, Dialect::YearRange), text);
        }
    }

    #[test]
    fn root_range_absorbs_outer_parentheses() {
        assert_eq!(
            translate("(\"2015:2025\"[pdat])", Dialect::YearRange),
            "PUB_YEAR:(2015 TO 2025)"
        );
    }

    #[test]
    fn tag_stripping_removes_all_brackets() {
        let out = translate(
            "((\"cancer\"[MeSH] OR \"tumor\"[TIAB]) AND \"2015:2025\"[pdat] NOT animal[MeSH Terms])",
            Dialect::TagStripping,
        );
        assert_eq!(
            out,
            "((\"cancer\" OR \"tumor\") AND \"2015:2025\" NOT animal)"
        );
        assert!(!out.contains('['));
    }

    #[test]
    fn tag_stripping_keeps_words_of_quoted_brackets() {
        assert_eq!(strip_tags("\"a [b]\"[ti]"), "\"a b\"");
        assert_eq!(strip_tags("'x]y'"), "'xy'");
    }

    #[test]
    fn tag_stripping_output_has_no_brackets_even_in_phrases() {
        let out = translate(
            "(\"IL-6 [interleukin]\"[TIAB] OR 'receptor [soluble'[MeSH])",
            Dialect::TagStripping,
        );
        assert_eq!(out, "(\"IL-6 interleukin\" OR 'receptor soluble')");
        assert!(!out.contains('['));
    }

    #[test]
    fn unknown_target_passes_through_with_warning() {
        let (out, warning) = translate_for("(\"a\"[ti])", &Target::Unknown("scopus".into()));
        assert_eq!(out, "(\"a\"[ti])");
        assert_eq!(
            warning,
            Some(CompileWarning::UnknownBackend {
                name: "scopus".into()
            })
        );
    }

    #[test]
    fn known_target_has_no_warning() {
        let (out, warning) = translate_for("(\"a\"[ti])", &Backend::Cochrane.into());
        assert_eq!(out, "(\"a\")");
        assert_eq!(warning, None);
    }
}
