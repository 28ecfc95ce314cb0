//! Implementation of `litq explain`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use litq_highlight::{highlight_query, indent_content};
use litq_query::{ParsedQuery, QueryParser, Summary};
use serde::Serialize;

use crate::cli::{
    args::ExplainCommand,
    context::CommandContext,
    output::{dim, labeled, print_json, print_query_error, subheader},
};

use super::shared::{combine, read_queries};

/// JSON output for `litq explain`.
#[derive(Serialize)]
struct JsonExplain<'a> {
    /// The parse result.
    #[serde(flatten)]
    parsed: &'a ParsedQuery,
    /// Counts of the query's parts.
    summary: Summary,
}

/// Shows how a query is tokenized, grouped and parsed.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let parser = ctx.parser(&cmd.parser);
    let sources = match read_queries(&cmd.input) {
        Ok(sources) => sources,
        Err(code) => return code,
    };
    let query = match combine(&parser, &sources) {
        Ok(query) => query,
        Err(code) => return code,
    };
    let parsed = match parser.parse(&query) {
        Ok(parsed) => parsed,
        Err(err) => {
            print_query_error(None, &err);
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        let out = JsonExplain {
            parsed: &parsed,
            summary: parsed.summary(),
        };
        return match print_json(&out) {
            Ok(()) => ExitCode::SUCCESS,
            Err(code) => code,
        };
    }

    print_explanation(&parsed, &parser);
    ExitCode::SUCCESS
}

/// Prints every stage of the parse.
fn print_explanation(parsed: &ParsedQuery, parser: &QueryParser) {
    println!("{}", labeled("format", &parsed.format.to_string()));
    println!("{}", labeled("mixing", &parser.policy().to_string()));
    println!(
        "{}",
        labeled("canonical", &highlight_query(&parsed.canonical, parser.table()))
    );
    println!();

    println!("{}", subheader("Tokens:"));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Kind", "Token"]);
    for (i, token) in parsed.tokens.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(token.kind_name()),
            Cell::new(token.to_string()),
        ]);
    }
    println!("{table}");
    println!();

    println!("{}", subheader("Groups (innermost first):"));
    if parsed.groups.is_empty() {
        println!("  {}", dim("(none)"));
    } else {
        for (i, group) in parsed.groups.iter().enumerate() {
            println!("  {} {group}", dim(&format!("{}.", i + 1)));
        }
    }
    println!();

    println!("{}", subheader("Tree:"));
    println!("{}", indent_content(&parsed.expr.to_string(), 2));
    println!();

    print_summary(&parsed.summary());
}

/// Prints the part counts.
fn print_summary(summary: &Summary) {
    println!("{}", subheader("Summary:"));
    println!("  {}", labeled("phrases", &summary.phrases.to_string()));
    let fields = if summary.fields.is_empty() {
        String::new()
    } else {
        format!(" ({})", summary.fields.join(", "))
    };
    println!(
        "  {}",
        labeled("field terms", &format!("{}{fields}", summary.field_terms))
    );
    println!(
        "  {}",
        labeled(
            "operators",
            &format!(
                "AND {}, OR {}, NOT {}",
                summary.and, summary.or, summary.not
            )
        )
    );
    println!("  {}", labeled("groups", &summary.groups.to_string()));
    println!("  {}", labeled("depth", &summary.depth.to_string()));
}
