use carbon_core::error::CarbonError;
use std::path::PathBuf;

use super::{read_input, resolve_table};
use crate::output;

pub fn run(
    input_file: PathBuf,
    preset: Option<String>,
    factors: Option<PathBuf>,
    output_format: &str,
    verbose: bool,
    trace: bool,
) -> Result<(), CarbonError> {
    let table = resolve_table(preset, factors)?;
    let parsed = read_input(&input_file)?;
    let report = carbon_core::calculate_parsed(&parsed, &table);

    // Warnings go to stderr so JSON on stdout stays machine-readable
    for w in &report.trace.warnings {
        match w.line {
            Some(line) => eprintln!("  warning: {line}: {}", w.message),
            None => eprintln!("  warning: {}", w.message),
        }
    }

    match output_format {
        "json" if trace => output::json::print(&report)?,
        "json" => output::json::print(&report.result)?,
        _ => output::table::print_result(&report, &table, verbose),
    }

    Ok(())
}
