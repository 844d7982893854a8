use carbon_core::error::CarbonError;
use std::path::PathBuf;

use super::read_input;
use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), CarbonError> {
    let parsed = read_input(&input_file)?;

    let output_str = match output_format {
        "json" => serde_json::to_string_pretty(&parsed)?,
        _ => output::table::format_parsed(&parsed),
    };

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&parsed)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} line item(s), written to {}",
                parsed.input.line_count(),
                path.display()
            );
            for w in &parsed.warnings {
                eprintln!("  warning: {}: {}: {}", w.line, w.field, w.reason);
            }
        }
        None => {
            println!("{output_str}");
        }
    }

    Ok(())
}
