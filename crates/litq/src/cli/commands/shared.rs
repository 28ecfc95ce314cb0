//! Helpers shared by the query commands.

use std::{fs, process::ExitCode};

use litq_query::QueryParser;

use crate::cli::{args::QueryInput, output::print_query_error};

/// One query and where it came from.
pub struct QuerySource {
    /// Display name: the file path, or `query N` for inline text.
    pub label: String,
    /// Raw query text.
    pub text: String,
}

/// Collects the inline queries and the contents of every query file.
pub fn read_queries(input: &QueryInput) -> Result<Vec<QuerySource>, ExitCode> {
    let mut sources: Vec<QuerySource> = input
        .queries
        .iter()
        .enumerate()
        .map(|(i, text)| QuerySource {
            label: format!("query {}", i + 1),
            text: text.clone(),
        })
        .collect();

    for path in &input.files {
        let text = fs::read_to_string(path).map_err(|e| {
            eprintln!("error: failed to read {}: {e}", path.display());
            ExitCode::FAILURE
        })?;
        sources.push(QuerySource {
            label: path.display().to_string(),
            text,
        });
    }

    Ok(sources)
}

/// Reduces the sources to one query text.
///
/// A single source is returned as written. Several sources are validated one
/// by one, so an error is reported against the source that caused it, and
/// their canonical forms are joined as `q1 OR q2 ...`. Canonical forms carry
/// their own parentheses, so joining adds exactly one level of nesting.
pub fn combine(parser: &QueryParser, sources: &[QuerySource]) -> Result<String, ExitCode> {
    if let [only] = sources {
        return Ok(only.text.clone());
    }

    let mut parts = Vec::with_capacity(sources.len());
    for source in sources {
        match parser.parse(&source.text) {
            Ok(parsed) => parts.push(parsed.canonical),
            Err(err) => {
                print_query_error(Some(&source.label), &err);
                return Err(ExitCode::FAILURE);
            }
        }
    }
    Ok(parts.join(" OR "))
}
