//! Implementation of `litq check`.

use std::{fs, path::Path, process::ExitCode};

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use litq_backend::{Diagnostic, Severity};
use litq_query::{QueryError, QueryFormat, QueryParser};
use serde::Serialize;

use crate::cli::{
    args::CheckCommand,
    context::CommandContext,
    output::{dim, format_query_error, print_json, subheader},
};

/// Outcome of checking one query file.
#[derive(Serialize)]
struct CheckEntry {
    /// The file as given on the command line.
    file: String,
    /// True if the query validated.
    success: bool,
    /// The detected format.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<QueryFormat>,
    /// The canonical expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<String>,
    /// Why the file failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<Diagnostic>,
    /// The full parse error, for text rendering.
    #[serde(skip)]
    error: Option<QueryError>,
}

/// Validates each query file and prints a status table.
pub fn run(ctx: &CommandContext, cmd: &CheckCommand) -> ExitCode {
    let parser = ctx.parser(&cmd.parser);
    let entries: Vec<CheckEntry> = cmd
        .files
        .iter()
        .map(|path| check_file(&parser, path))
        .collect();
    let failed = entries.iter().filter(|e| !e.success).count();

    if cmd.json {
        if let Err(code) = print_json(&entries) {
            return code;
        }
    } else {
        print_table(&entries);
        print_failures(&entries);
        println!(
            "{}",
            dim(&format!(
                "{} checked, {} ok, {failed} failed",
                entries.len(),
                entries.len() - failed
            ))
        );
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Reads and parses one file.
fn check_file(parser: &QueryParser, path: &Path) -> CheckEntry {
    let file = path.display().to_string();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            return CheckEntry {
                file,
                success: false,
                format: None,
                canonical: None,
                diagnostic: Some(Diagnostic {
                    severity: Severity::Error,
                    message: format!("failed to read file: {e}"),
                    line: None,
                    hint: None,
                }),
                error: None,
            };
        }
    };

    match parser.parse(&text) {
        Ok(parsed) => CheckEntry {
            file,
            success: true,
            format: Some(parsed.format),
            canonical: Some(parsed.canonical),
            diagnostic: None,
            error: None,
        },
        Err(err) => CheckEntry {
            file,
            success: false,
            format: None,
            canonical: None,
            diagnostic: Some(Diagnostic::from(&err)),
            error: Some(err),
        },
    }
}

/// Prints one row per file.
fn print_table(entries: &[CheckEntry]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["File", "Status", "Format", "Detail"]);
    for entry in entries {
        let status = if entry.success { "ok" } else { "error" };
        let format = entry
            .format
            .map_or_else(|| "-".to_string(), |f| f.to_string());
        let detail = match (&entry.canonical, &entry.diagnostic) {
            (Some(canonical), _) => canonical.clone(),
            (None, Some(d)) => match d.line {
                Some(line) => format!("line {line}: {}", d.message),
                None => d.message.clone(),
            },
            (None, None) => String::new(),
        };
        table.add_row(vec![
            Cell::new(&entry.file),
            Cell::new(status),
            Cell::new(format),
            Cell::new(detail),
        ]);
    }
    println!("{table}");
}

/// Prints the full error, with caret and hint, for each failed parse.
fn print_failures(entries: &[CheckEntry]) {
    for entry in entries {
        if let Some(err) = &entry.error {
            println!();
            println!("{}", subheader(&format!("{}:", entry.file)));
            println!("{}", format_query_error(err));
        }
    }
    println!();
}
