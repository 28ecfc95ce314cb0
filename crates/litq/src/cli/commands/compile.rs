//! Implementation of `litq compile`.

use std::process::ExitCode;

use litq_backend::{CompileResult, compile};

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    output::{labeled, print_json, print_query_error},
};

use super::shared::{combine, read_queries};

/// Compiles the query for every requested backend.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let parser = ctx.parser(&cmd.parser);
    let sources = match read_queries(&cmd.input) {
        Ok(sources) => sources,
        Err(code) => return code,
    };
    let query = match combine(&parser, &sources) {
        Ok(query) => query,
        Err(code) => return code,
    };

    let targets = ctx.targets(&cmd.backends);
    if targets.is_empty() {
        eprintln!("error: no backend given and none configured");
        eprintln!("use -b BACKEND or set [compile] backend in .litq.toml");
        return ExitCode::FAILURE;
    }

    let results: Vec<CompileResult> = targets
        .iter()
        .map(|target| compile(&query, target, &parser))
        .collect();
    let success = results.iter().all(|r| r.success);

    if cmd.json {
        let printed = match results.as_slice() {
            [only] => print_json(only),
            all => print_json(all),
        };
        if let Err(code) = printed {
            return code;
        }
    } else {
        print_text(&results);
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Prints the canonical form once, then one line per backend.
///
/// Validation does not depend on the backend, so a failure is reported once.
fn print_text(results: &[CompileResult]) {
    let Some(first) = results.first() else {
        return;
    };
    if let Some(err) = &first.error {
        print_query_error(None, err);
        return;
    }
    if let Some(canonical) = &first.canonical {
        println!("{}", labeled("canonical", canonical));
    }
    for result in results {
        if let Some(query) = &result.backend_query {
            println!("{}", labeled(&result.backend, query));
        }
    }
}
