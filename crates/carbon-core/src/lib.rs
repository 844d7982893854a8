pub mod calculate;
pub mod error;
pub mod factors;
pub mod import;
pub mod model;
pub mod parsing;
pub mod trace;
pub mod validate;

use calculate::engine::{evaluate_lines, result_from_lines};
use calculate::outcome::CalculationResult;
use error::CarbonError;
use factors::EmissionFactorTable;
use model::CalculationInput;
use parsing::ParsedInput;
use serde::{Deserialize, Serialize};
use std::path::Path;
use trace::TraceBundle;

pub use calculate::{
    calculate, calculate_energy_emissions, calculate_material_emissions,
    calculate_scope_emissions, calculate_total_emissions, calculate_transport_emissions,
};
pub use validate::{validate_calculation_input, validate_calculation_result};

/// Supported input document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Xlsx,
}

impl InputFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<InputFormat, CarbonError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(InputFormat::Json),
            "xlsx" => Ok(InputFormat::Xlsx),
            _ => Err(CarbonError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A calculation result together with the trace of how it was reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationReport {
    pub result: CalculationResult,
    pub trace: TraceBundle,
}

/// Parse an input document into canonical calculation input.
pub fn parse_input(bytes: &[u8], format: InputFormat) -> Result<ParsedInput, CarbonError> {
    match format {
        InputFormat::Json => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| CarbonError::ParseError(format!("input is not UTF-8: {e}")))?;
            parsing::parse_input_json(text)
        }
        InputFormat::Xlsx => import::parse_input_xlsx(bytes),
    }
}

/// Calculate emissions and record a trace of every line item.
pub fn calculate_traced(input: &CalculationInput, table: &EmissionFactorTable) -> CalculationReport {
    let lines = evaluate_lines(input, table);
    CalculationReport {
        result: result_from_lines(&lines, table),
        trace: trace::build_trace(input, &lines, table),
    }
}

/// Main API entry point: calculate parsed input, carrying parse warnings into the trace.
pub fn calculate_parsed(parsed: &ParsedInput, table: &EmissionFactorTable) -> CalculationReport {
    let mut report = calculate_traced(&parsed.input, table);
    let mut warnings = trace::parse_warnings(&parsed.warnings);
    warnings.append(&mut report.trace.warnings);
    report.trace.warnings = warnings;
    report
}
