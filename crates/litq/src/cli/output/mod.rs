//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

pub use litq_highlight::{dim, subheader, success};
use litq_highlight::error;
use litq_query::QueryError;
use serde::Serialize;

/// Width of the label column in key/value output.
pub const LABEL_WIDTH: usize = 11;

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ExitCode> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Formats a dimmed, padded label followed by a value.
pub fn labeled(label: &str, value: &str) -> String {
    format!("{} {value}", dim(&format!("{label:<LABEL_WIDTH$}")))
}

/// Renders a query error for the terminal.
///
/// The headline is red and the hint dimmed; the echoed query and caret are
/// left plain so they stay aligned.
pub fn format_query_error(err: &QueryError) -> String {
    err.to_string()
        .lines()
        .map(|line| {
            if line.starts_with("hint:") {
                dim(line)
            } else if line.starts_with("query syntax error") {
                error(line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints a query error to stderr, optionally naming its source.
pub fn print_query_error(source: Option<&str>, err: &QueryError) {
    if let Some(source) = source {
        eprintln!("{}", subheader(&format!("{source}:")));
    }
    eprintln!("{}", format_query_error(err));
}

#[cfg(test)]
mod tests {
    use litq_query::parse;

    use super::*;

    #[test]
    fn labeled_pads_label() {
        let line = labeled("pubmed", "(\"a\")");
        assert!(line.contains("pubmed     "));
        assert!(line.ends_with(" (\"a\")"));
    }

    #[test]
    fn query_error_keeps_all_lines() {
        let err = parse("\"a\" AND \"b\" OR \"c\"").unwrap_err();
        let rendered = format_query_error(&err);
        assert_eq!(rendered.lines().count(), err.to_string().lines().count());
        assert!(rendered.contains("hint:"));
    }
}
