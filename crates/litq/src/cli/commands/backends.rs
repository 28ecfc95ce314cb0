//! Implementation of `litq backends`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use litq_backend::Backend;

/// Lists the supported backends.
pub fn run() -> ExitCode {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Backend", "Aliases", "Dialect", "Description"]);
    for backend in Backend::ALL {
        table.add_row(vec![
            Cell::new(backend.name()),
            Cell::new(backend.aliases().join(", ")),
            Cell::new(backend.dialect()),
            Cell::new(backend.description()),
        ]);
    }
    println!("{table}");
    ExitCode::SUCCESS
}
