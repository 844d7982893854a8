use carbon_core::error::CarbonError;
use carbon_core::validate::{IssueSeverity, ValidationReport};
use std::path::PathBuf;

use super::{read_input, resolve_table};

pub fn run(
    input_file: PathBuf,
    preset: Option<String>,
    factors: Option<PathBuf>,
) -> Result<(), CarbonError> {
    let table = resolve_table(preset, factors)?;
    let parsed = read_input(&input_file)?;

    let mut report = carbon_core::validate_calculation_input(&parsed.input, &table);
    let result = carbon_core::calculate(&parsed.input, &table);
    report.merge(carbon_core::validate_calculation_result(&result));

    println!(
        "Checked {} line item(s) against '{}' (v{}).",
        parsed.input.line_count(),
        table.name(),
        table.version()
    );

    if !parsed.warnings.is_empty() {
        println!("\nParse warnings:");
        for w in &parsed.warnings {
            println!("  - {}: {}: {}", w.line, w.field, w.reason);
        }
    }

    print_issues(&report);

    if report.has_errors() {
        return Err(CarbonError::InvalidInput(format!(
            "{} error(s) found",
            report.errors().count()
        )));
    }
    Ok(())
}

fn print_issues(report: &ValidationReport) {
    if report.is_clean() {
        println!("No issues found.");
        return;
    }

    println!();
    for issue in &report.issues {
        let level = match issue.severity {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
        };
        match issue.line {
            Some(line) => println!("  {level}: {line}: {}", issue.message),
            None => println!("  {level}: {}", issue.message),
        }
    }
}
